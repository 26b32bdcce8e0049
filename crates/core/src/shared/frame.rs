use ndarray::ArrayView3;

/// A captured photo or live video frame: contiguous bytes in row-major order.
///
/// `channels` is 3 (RGB) or 4 (RGBA). Camera captures arrive as RGBA;
/// decoding and encoding happen at I/O boundaries only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Fully transparent RGBA frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(
            vec![0; (width as usize) * (height as usize) * 4],
            width,
            height,
            4,
            0,
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Byte offset of pixel `(col, row)`.
    pub fn offset(&self, col: usize, row: usize) -> usize {
        (row * self.width as usize + col) * self.channels as usize
    }

    pub fn pixel(&self, col: usize, row: usize) -> &[u8] {
        let off = self.offset(col, row);
        &self.data[off..off + self.channels as usize]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

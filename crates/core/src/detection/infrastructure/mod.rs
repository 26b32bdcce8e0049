pub mod description_face_detector;
pub mod downscaled_detector;
pub mod execution_provider;
pub mod model_resolver;
pub mod null_face_detector;
pub mod onnx_blazeface_detector;
pub mod skip_frame_detector;

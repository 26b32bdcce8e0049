use ort::execution_providers::ExecutionProviderDispatch;

/// Name of the accelerator tried first on this platform.
pub fn preferred_provider_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "CoreML"
    } else if cfg!(target_os = "windows") {
        "DirectML"
    } else {
        "CPU"
    }
}

/// ONNX execution providers for the current platform, best first.
///
/// An empty list leaves ONNX Runtime on its CPU provider, which is also
/// where it falls back when a listed provider fails to register.
pub fn preferred_execution_providers() -> Vec<ExecutionProviderDispatch> {
    log::debug!("Preferred execution provider: {}", preferred_provider_name());
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_list_matches_name() {
        let providers = preferred_execution_providers();
        if preferred_provider_name() == "CPU" {
            assert!(providers.is_empty());
        } else {
            assert_eq!(providers.len(), 1);
        }
    }
}

use reqconv::{ReqconvError, Result};

#[test]
fn test_config_error() {
    let err = ReqconvError::ConfigError("bad value".to_string());
    assert_eq!(err.to_string(), "配置文件错误: bad value");
}

#[test]
fn test_error_conversion_from_anyhow() {
    let anyhow_err = anyhow::anyhow!("test anyhow error");
    let err: ReqconvError = anyhow_err.into();
    assert!(err.to_string().contains("test anyhow error"));
}

#[test]
fn test_error_conversion_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: ReqconvError = io_err.into();
    assert!(matches!(err, ReqconvError::IoError(_)));
}

#[test]
fn test_result_type() {
    fn returns_error() -> Result<()> {
        Err(ReqconvError::Other("test".to_string()))
    }

    match returns_error() {
        Err(ReqconvError::Other(msg)) => assert_eq!(msg, "test"),
        _ => panic!("Expected Other"),
    }
}

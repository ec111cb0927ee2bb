use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("validation failed: {0}")]
    Validation(#[from] jsonkv_store::ValidationError),

    #[error("encode error: {0}")]
    Encode(#[from] jsonkv_codec::EncodeError),
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use jsonkv_store::{FlatStore, Validator};

    #[test]
    fn record_failures_convert() {
        let err: SdkError = jsonkv_codec::encode(&f64::NAN).unwrap_err().into();
        assert!(matches!(err, SdkError::Encode(_)));

        let store = FlatStore::from([("k".to_string(), "oops".to_string())]);
        let err: SdkError = Validator::validate(&store).unwrap_err().into();
        match err {
            SdkError::Validation(v) => assert_eq!(v.key, "k"),
            SdkError::Encode(e) => panic!("unexpected encode error: {e}"),
        }
    }
}

use crate::error::WebRequestError;

pub fn exit_code_for_error(err: &WebRequestError) -> i32 {
    match err {
        WebRequestError::InvalidArgument(_) => 3,
        WebRequestError::InvalidState(_) => 2,
        WebRequestError::UnsupportedMethod(_) => 4,
        WebRequestError::Timeout => 28,
        WebRequestError::Decode(_) => 61,
        WebRequestError::ContentTooLarge(_) => 63,
        WebRequestError::Io(_) => 23,
        WebRequestError::Http(err) => http_exit_code(err),
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_builder() {
        return 3;
    }
    if err.is_decode() || err.is_body() {
        return 61;
    }
    56
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::config::HttpMethod;
    use crate::error::WebRequestError;

    #[test]
    fn exit_code_maps_invalid_argument() {
        let err = WebRequestError::InvalidArgument("bad".to_string());
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn exit_code_maps_unsupported_method() {
        let err = WebRequestError::UnsupportedMethod(HttpMethod::Put);
        assert_eq!(exit_code_for_error(&err), 4);
    }

    #[test]
    fn exit_code_maps_timeout_and_size() {
        assert_eq!(exit_code_for_error(&WebRequestError::Timeout), 28);
        assert_eq!(
            exit_code_for_error(&WebRequestError::ContentTooLarge(1 << 40)),
            63
        );
    }
}

use validator::ValidationError;

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("must not be blank"));
    }
    Ok(())
}

/// 形如 #RRGGBB 的颜色
pub fn validate_color(value: &str) -> Result<(), ValidationError> {
    match value.strip_prefix('#') {
        Some(hex) if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) => Ok(()),
        _ => Err(ValidationError::new("color must be in #RRGGBB format")),
    }
}

pub fn validate_time(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("time must be a finite non-negative number"))
    }
}

pub fn validate_chat_role(value: &str) -> Result<(), ValidationError> {
    if value == "user" || value == "assistant" {
        Ok(())
    } else {
        Err(ValidationError::new("role must be either user or assistant"))
    }
}

pub fn validate_douban_kind(value: &str) -> Result<(), ValidationError> {
    if value == "movie" || value == "tv" {
        Ok(())
    } else {
        Err(ValidationError::new("kind must be either movie or tv"))
    }
}

pub fn validate_douban_id(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("douban id must be numeric"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#FFFFFF").is_ok());
        assert!(validate_color("#00ff7f").is_ok());
        assert!(validate_color("FFFFFF").is_err());
        assert!(validate_color("#FFF").is_err());
        assert!(validate_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time(0.0).is_ok());
        assert!(validate_time(1234.5).is_ok());
        assert!(validate_time(-0.1).is_err());
        assert!(validate_time(f64::NAN).is_err());
        assert!(validate_time(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("弹幕").is_ok());
        assert!(validate_not_blank(" \t\n").is_err());
    }
}

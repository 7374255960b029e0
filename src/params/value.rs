//! Kind-specific value validation
//!
//! Each declared parameter carries an expected kind; the checks here run at
//! merge time so an expansion never works with a value it would later have to
//! reject at a field boundary.

use super::{ParamError, ParamKind};

/// Validate a value against its parameter's declared kind
pub(super) fn validate(kind: ParamKind, name: &str, value: &str) -> Result<(), ParamError> {
    if value.is_empty() {
        return Err(malformed(name, "value must not be empty"));
    }
    match kind {
        ParamKind::Str => Ok(()),
        ParamKind::Port => parse_port(name, value).map(|_| ()),
        ParamKind::Hostname => validate_hostname(name, value),
        ParamKind::Url => validate_url(name, value),
        ParamKind::ImageRepo => validate_image_repo(name, value),
    }
}

/// Parse a port value, enforcing the `[1, 65535]` range
pub(super) fn parse_port(name: &str, value: &str) -> Result<u16, ParamError> {
    let port: u32 = value
        .parse()
        .map_err(|_| malformed(name, &format!("'{}' is not an integer", value)))?;
    if !(1..=65535).contains(&port) {
        return Err(malformed(
            name,
            &format!("port {} is outside [1, 65535]", port),
        ));
    }
    Ok(port as u16)
}

/// DNS-1123 hostname: dot-separated labels of 1-63 alphanumeric/hyphen
/// characters, no leading or trailing hyphen, at most 253 characters total.
fn validate_hostname(name: &str, value: &str) -> Result<(), ParamError> {
    if value.len() > 253 {
        return Err(malformed(name, "hostname exceeds 253 characters"));
    }
    for label in value.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(malformed(
                name,
                &format!("hostname label '{}' must be 1-63 characters", label),
            ));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(malformed(
                name,
                &format!("hostname label '{}' has invalid characters", label),
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(malformed(
                name,
                &format!("hostname label '{}' starts or ends with a hyphen", label),
            ));
        }
    }
    Ok(())
}

fn validate_url(name: &str, value: &str) -> Result<(), ParamError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) if !rest.is_empty() => Ok(()),
        _ => Err(malformed(
            name,
            &format!("'{}' is not an http(s) URL", value),
        )),
    }
}

/// Image repository reference without tag or digest; the tag is a separate
/// parameter, so a ':' or '@' here would double it in the image field.
fn validate_image_repo(name: &str, value: &str) -> Result<(), ParamError> {
    if value.chars().any(|c| c.is_whitespace()) {
        return Err(malformed(name, "image repository contains whitespace"));
    }
    if value.contains(':') || value.contains('@') {
        return Err(malformed(
            name,
            "image repository must not include a tag or digest",
        ));
    }
    Ok(())
}

fn malformed(name: &str, reason: &str) -> ParamError {
    ParamError::MalformedValue {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

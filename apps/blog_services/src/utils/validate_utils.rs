use logger_libs::{info_logger, warning_logger};
use validator::{Validate, ValidationErrors};

use crate::error::{BlogError, FormErrors};

pub fn form_validate<T: Validate>(
    data: &T,
    log_id: &str,
    handler: &str,
) -> Result<(), BlogError> {
    let method_name = "validate";

    if let Err(errors) = data.validate() {
        let error_map = collect_errors(&errors);
        warning_logger(log_id, handler, method_name, &format!("{:?}", error_map));
        return Err(BlogError::Validation(error_map));
    }

    info_logger(log_id, handler, method_name);
    Ok(())
}

pub fn collect_errors(errors: &ValidationErrors) -> FormErrors {
    let mut error_map = FormErrors::new();

    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors.iter().map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| error.code.to_string())
        });
        error_map.entry(field.to_string()).or_default().extend(messages);
    }

    error_map
}

pub fn merge_errors(into: &mut FormErrors, from: FormErrors) {
    for (field, messages) in from {
        into.entry(field).or_default().extend(messages);
    }
}

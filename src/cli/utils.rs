use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format. Text mode prints the
/// message verbatim so operator tooling can match on the exact line.
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(object), Some(Value::Object(data))) = (response.as_object_mut(), data) {
                object.extend(data);
            }

            println!("{response:#}");
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
}

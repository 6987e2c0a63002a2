//! Multipart form encoding of intake payloads.

use reqwest::multipart::{Form, Part};

use signage_core::intake::payload::{self, FormPart, IntakePayload};

/// Build the multipart form for a payload.
///
/// Text parts follow [`payload::encode_parts`]; attachments become binary
/// parts carrying their file name and content type.
pub fn build_form(payload: &IntakePayload) -> Result<Form, reqwest::Error> {
    payload::encode_parts(payload)
        .into_iter()
        .try_fold(Form::new(), |form, part| -> Result<Form, reqwest::Error> {
            Ok(match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File { name, attachment } => {
                    let file = Part::bytes(attachment.bytes)
                        .file_name(attachment.file_name)
                        .mime_str(&attachment.content_type)?;
                    form.part(name, file)
                }
            })
        })
}

//! Reply texts, one set per profile field.
//!
//! All replies are CommonMark, the dialect `InputMessage::markdown`
//! parses: `**bold**`, `_italic_`, inline code, and fenced blocks with
//! the fences on their own lines. Descriptions are echoed inside a fenced
//! block so their own formatting characters and line breaks reach the
//! user unchanged.

use crate::config::ProfileField;

/// Reply for a getter.
pub fn current(field: ProfileField, value: &str) -> String {
    match field {
        ProfileField::Name => format!("**📝 Current Bot Name:**\n`{value}`"),
        ProfileField::Description => fenced("**📝 My Current Description:**", value),
        ProfileField::ShortDescription => fenced("**📝 My Short Description:**", value),
    }
}

/// Reply when a setter got no usable input.
pub fn missing_input(field: ProfileField) -> String {
    match field {
        ProfileField::Name => "❌ _Please provide a new bot name!_".to_owned(),
        ProfileField::Description => {
            "❌ _Please provide a description or reply to a message with the desired description._"
                .to_owned()
        }
        ProfileField::ShortDescription => {
            "❌ _Please provide a short description or reply to a message containing it._"
                .to_owned()
        }
    }
}

/// Reply when the input exceeds the field's limit.
pub fn too_long(field: ProfileField) -> String {
    let max = field.max_length();
    match field {
        ProfileField::Name => {
            format!("❌ _Bot name too long!_ Maximum length is `{max}` characters.")
        }
        ProfileField::Description => {
            format!("❌ _Description too long!_ Max length: `{max}` characters.")
        }
        ProfileField::ShortDescription => {
            format!("❌ _Short description too long!_ Max allowed: **{max}** characters.")
        }
    }
}

/// Confirmation after a successful update.
pub fn updated(field: ProfileField, value: &str) -> String {
    match field {
        ProfileField::Name => format!("✅ **Bot name updated successfully to:**\n`{value}`"),
        ProfileField::Description => fenced("✅ **Bot description updated!**", value),
        ProfileField::ShortDescription => format!(
            "✅ **Short description updated!**\n`{}`",
            sanitize_inline_code(value)
        ),
    }
}

/// Reply when Telegram answered the update with `false`.
pub fn refused(field: ProfileField) -> String {
    match field {
        ProfileField::Name => "⚠️ _Failed to update bot name. Try again later._".to_owned(),
        ProfileField::Description => {
            "⚠️ _Failed to update the description. Try again later._".to_owned()
        }
        ProfileField::ShortDescription => {
            "⚠️ _Failed to update the short description. Try again later._".to_owned()
        }
    }
}

/// Reply when the Telegram API reported an error.
pub fn api_error(field: ProfileField) -> String {
    match field {
        ProfileField::Name => "🚫 _Telegram API Error occurred while updating the name._",
        ProfileField::Description => "🚫 _Telegram API Error while updating the description._",
        ProfileField::ShortDescription => {
            "🚫 _Telegram API Error while updating the short description._"
        }
    }
    .to_owned()
}

/// Reply for any other failure.
pub fn unexpected_error(field: ProfileField) -> String {
    match field {
        ProfileField::Name => "🚫 _An unexpected error occurred while setting the name._",
        ProfileField::Description | ProfileField::ShortDescription => {
            "🚫 _An unexpected error occurred._"
        }
    }
    .to_owned()
}

/// Puts `value` in a fenced code block below `header`.
fn fenced(header: &str, value: &str) -> String {
    format!("{header}\n```\n{value}\n```")
}

/// Makes text safe to place inside an inline code span.
///
/// Back-ticks would close the span and asterisks toggle bold in the
/// surrounding reply.
pub fn sanitize_inline_code(text: &str) -> String {
    text.replace('`', "'").replace('*', "")
}

#[cfg(test)]
mod tests {
    use grammers_client::parsers::parse_markdown_message;
    use grammers_tl_types as tl;

    use super::*;

    fn has_bold(entities: &[tl::enums::MessageEntity]) -> bool {
        entities
            .iter()
            .any(|e| matches!(e, tl::enums::MessageEntity::Bold(_)))
    }

    fn has_pre(entities: &[tl::enums::MessageEntity]) -> bool {
        entities
            .iter()
            .any(|e| matches!(e, tl::enums::MessageEntity::Pre(_)))
    }

    fn has_code(entities: &[tl::enums::MessageEntity]) -> bool {
        entities
            .iter()
            .any(|e| matches!(e, tl::enums::MessageEntity::Code(_)))
    }

    #[test]
    fn test_sanitize_inline_code() {
        assert_eq!(sanitize_inline_code("a `b` *c*"), "a 'b' c");
        assert_eq!(sanitize_inline_code("plain"), "plain");
    }

    #[test]
    fn test_too_long_mentions_limit() {
        assert!(too_long(ProfileField::Name).contains("`64`"));
        assert!(too_long(ProfileField::Description).contains("`512`"));
        assert!(too_long(ProfileField::ShortDescription).contains("**120**"));
    }

    #[test]
    fn test_headers_render_bold() {
        for field in ProfileField::ALL {
            let (_, entities) = parse_markdown_message(&current(field, "value"));
            assert!(has_bold(&entities), "{field} getter header is not bold");

            let (_, entities) = parse_markdown_message(&updated(field, "value"));
            assert!(has_bold(&entities), "{field} confirmation header is not bold");
        }
    }

    #[test]
    fn test_descriptions_render_as_literal_block() {
        let value = "Line one\n*Line two* _three_";

        for reply in [
            current(ProfileField::Description, value),
            current(ProfileField::ShortDescription, value),
            updated(ProfileField::Description, value),
        ] {
            let (text, entities) = parse_markdown_message(&reply);
            assert!(has_pre(&entities), "no code block in {reply:?}");
            assert!(text.contains(value), "formatting lost in {text:?}");
        }
    }

    #[test]
    fn test_name_renders_as_inline_code() {
        let (text, entities) = parse_markdown_message(&current(ProfileField::Name, "My*Bot"));
        assert!(has_code(&entities));
        assert!(!has_pre(&entities));
        assert!(text.contains("My*Bot"));

        let (text, entities) = parse_markdown_message(&updated(ProfileField::Name, "My*Bot"));
        assert!(has_code(&entities));
        assert!(text.contains("My*Bot"));
    }

    #[test]
    fn test_short_description_confirmation_renders_sanitized_code() {
        let reply = updated(ProfileField::ShortDescription, "a `b` *c*");
        let (text, entities) = parse_markdown_message(&reply);
        assert!(has_code(&entities));
        assert!(text.contains("a 'b' c"));
    }

    #[test]
    fn test_description_fence_on_own_lines() {
        assert_eq!(
            current(ProfileField::Description, "*bold* _it_"),
            "**📝 My Current Description:**\n```\n*bold* _it_\n```"
        );
    }
}

// src/api/notion_client_adapter.rs
//! Converts notion-client types into the report model.
//!
//! Conversion is lenient: anything the report cannot use becomes an
//! `Unsupported` property or block instead of an error, so one odd value
//! never costs a whole page.

use crate::error::AppError;
use crate::model::{
    Block, BlockCommon, BlockKind, DateValue, FormulaValue, MediaKind, Property, Record, UNTITLED,
};
use crate::types::{
    plain_text_of, Annotations, BlockId, PageId, PropertyName, RichTextItem, RichTextKind,
};
use notion_client::objects::block::BlockType;
use notion_client::objects::page::PageProperty;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Title properties checked by name before falling back to any title.
const TITLE_PROPERTY_CANDIDATES: [&str; 3] = ["Name", "Title", "Page"];

/// Convert a notion-client Page to a report Record.
pub fn convert_page(notion_page: notion_client::objects::page::Page) -> Result<Record, AppError> {
    let id = PageId::parse(&notion_page.id)?;
    let properties = convert_page_properties(notion_page.properties);
    let title = resolve_title(&properties);

    Ok(Record {
        id,
        title,
        url: notion_page.url,
        properties,
    })
}

/// Picks the display title: well-known names first, then any title property.
fn resolve_title(properties: &BTreeMap<PropertyName, Property>) -> String {
    let text_of = |property: &Property| match property {
        Property::Title(items) | Property::RichText(items) => {
            let text = plain_text_of(items).trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    };

    TITLE_PROPERTY_CANDIDATES
        .iter()
        .filter_map(|name| properties.get(*name))
        .find_map(text_of)
        .or_else(|| {
            properties
                .values()
                .filter(|p| matches!(p, Property::Title(_)))
                .find_map(text_of)
        })
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn convert_page_properties(
    properties: HashMap<String, PageProperty>,
) -> BTreeMap<PropertyName, Property> {
    properties
        .into_iter()
        .map(|(name, property)| (PropertyName::new(name), convert_page_property(property)))
        .collect()
}

/// Converts a Notion `DateOrDateTime` to a `NaiveDate`.
fn resolve_date(dod: notion_client::objects::page::DateOrDateTime) -> chrono::NaiveDate {
    match dod {
        notion_client::objects::page::DateOrDateTime::Date(d) => d,
        notion_client::objects::page::DateOrDateTime::DateTime(dt) => dt.date_naive(),
    }
}

/// A date without a start is treated as empty.
fn convert_notion_date(d: notion_client::objects::page::DatePropertyValue) -> Option<DateValue> {
    let start = d.start.map(resolve_date)?;
    Some(DateValue {
        start,
        end: d.end.map(resolve_date),
    })
}

fn select_name(s: notion_client::objects::page::SelectPropertyValue) -> Option<String> {
    s.name.filter(|name| !name.is_empty())
}

fn convert_formula_value(
    formula: Option<notion_client::objects::page::FormulaPropertyValue>,
) -> Option<FormulaValue> {
    use notion_client::objects::page::FormulaPropertyValue;

    formula.map(|f| match f {
        FormulaPropertyValue::String { string } => FormulaValue::String(string),
        FormulaPropertyValue::Number { number } => {
            FormulaValue::Number(number.and_then(|n| n.as_f64()))
        }
        FormulaPropertyValue::Boolean { boolean } => FormulaValue::Boolean(boolean),
        FormulaPropertyValue::Date { date } => {
            FormulaValue::Date(date.and_then(convert_notion_date))
        }
    })
}

/// Convert one page property. Types the report never shows become `Unsupported`.
fn convert_page_property(property: PageProperty) -> Property {
    match property {
        PageProperty::Title { title, .. } => Property::Title(convert_rich_text_array(title)),
        PageProperty::RichText { rich_text, .. } => {
            Property::RichText(convert_rich_text_array(rich_text))
        }
        PageProperty::Number { number, .. } => Property::Number(number.and_then(|n| n.as_f64())),
        PageProperty::Checkbox { checkbox, .. } => Property::Checkbox(checkbox),
        PageProperty::Url { url, .. } => Property::Url(url),
        PageProperty::Email { email, .. } => Property::Email(email),
        PageProperty::PhoneNumber { phone_number, .. } => Property::PhoneNumber(phone_number),
        PageProperty::Select { select, .. } => Property::Select(select.and_then(select_name)),
        PageProperty::MultiSelect { multi_select, .. } => Property::MultiSelect(
            multi_select.into_iter().filter_map(select_name).collect(),
        ),
        PageProperty::Status { status, .. } => Property::Status(status.and_then(select_name)),
        PageProperty::Date { date, .. } => Property::Date(date.and_then(convert_notion_date)),
        PageProperty::People { people, .. } => {
            Property::People(people.into_iter().filter_map(|u| u.name).collect())
        }
        PageProperty::CreatedTime { created_time, .. } => Property::CreatedTime(created_time),
        PageProperty::LastEditedTime {
            last_edited_time, ..
        } => Property::LastEditedTime(last_edited_time),
        PageProperty::Relation { relation, .. } => Property::Relation(
            relation
                .into_iter()
                .filter_map(|r| {
                    PageId::parse(&r.id)
                        .map_err(|e| {
                            log::warn!("Skipping relation with invalid ID '{}': {}", r.id, e)
                        })
                        .ok()
                })
                .collect(),
        ),
        PageProperty::Formula { formula, .. } => Property::Formula(convert_formula_value(formula)),
        PageProperty::Files { .. } => unsupported("files"),
        PageProperty::CreatedBy { .. } => unsupported("created_by"),
        PageProperty::LastEditedBy { .. } => unsupported("last_edited_by"),
        PageProperty::Rollup { .. } => unsupported("rollup"),
        PageProperty::UniqueID { .. } => unsupported("unique_id"),
        PageProperty::Verification { .. } => unsupported("verification"),
        PageProperty::Button { .. } => unsupported("button"),
    }
}

fn unsupported(type_name: &str) -> Property {
    Property::Unsupported {
        type_name: type_name.to_string(),
    }
}

/// Convert one raw block object from a children listing.
///
/// The raw JSON is kept until the type is known, so block types newer than
/// notion-client still yield their type name and visible text.
pub fn convert_block_value(value: Value) -> Result<Block, AppError> {
    let type_name = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    match serde_json::from_value::<notion_client::objects::block::Block>(value.clone()) {
        Ok(notion_block) => convert_block(notion_block, &type_name, &value),
        Err(e) => {
            log::debug!("notion-client could not decode '{}' block: {}", type_name, e);
            let common = common_from_json(&value)?;
            Ok(Block {
                common,
                kind: unsupported_block(&type_name, &value),
            })
        }
    }
}

fn common_from_json(value: &Value) -> Result<BlockCommon, AppError> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("Block missing required ID field".into()))?;
    let mut common = BlockCommon::new(BlockId::parse(id)?);
    common.has_children = value
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    common.archived = value
        .get("archived")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Ok(common)
}

/// Pulls whatever plain text the raw payload carries under its type key.
fn unsupported_block(type_name: &str, value: &Value) -> BlockKind {
    let text = value
        .get(type_name)
        .and_then(|payload| payload.get("rich_text"))
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
                .map(RichTextItem::plain_text)
                .collect()
        })
        .unwrap_or_default();

    BlockKind::Unsupported {
        block_type: type_name.to_string(),
        text,
    }
}

/// Convert notion-client Block to a report Block
pub fn convert_block(
    notion_block: notion_client::objects::block::Block,
    type_name: &str,
    raw: &Value,
) -> Result<Block, AppError> {
    let common = convert_block_common(&notion_block)?;

    let kind = match notion_block.block_type {
        BlockType::Paragraph { paragraph } => BlockKind::Paragraph {
            text: convert_rich_text_array(paragraph.rich_text),
        },
        BlockType::Heading1 { heading_1 } => BlockKind::Heading {
            level: 1,
            text: convert_rich_text_array(heading_1.rich_text),
        },
        BlockType::Heading2 { heading_2 } => BlockKind::Heading {
            level: 2,
            text: convert_rich_text_array(heading_2.rich_text),
        },
        BlockType::Heading3 { heading_3 } => BlockKind::Heading {
            level: 3,
            text: convert_rich_text_array(heading_3.rich_text),
        },
        BlockType::BulletedListItem { bulleted_list_item } => BlockKind::BulletedListItem {
            text: convert_rich_text_array(bulleted_list_item.rich_text),
        },
        BlockType::NumberedListItem { numbered_list_item } => BlockKind::NumberedListItem {
            text: convert_rich_text_array(numbered_list_item.rich_text),
        },
        BlockType::ToDo { to_do } => BlockKind::ToDo {
            text: convert_rich_text_array(to_do.rich_text),
            checked: to_do.checked.unwrap_or(false),
        },
        BlockType::Toggle { toggle } => BlockKind::Toggle {
            text: convert_rich_text_array(toggle.rich_text),
        },
        BlockType::Quote { quote } => BlockKind::Quote {
            text: convert_rich_text_array(quote.rich_text),
        },
        BlockType::Callout { callout } => BlockKind::Callout {
            text: convert_rich_text_array(callout.rich_text),
            icon: callout.icon.and_then(convert_icon),
        },
        BlockType::Code { code } => BlockKind::Code {
            text: convert_rich_text_array(code.rich_text),
            language: code_language(raw, &format!("{:?}", code.language)),
            caption: convert_rich_text_array(code.caption),
        },
        BlockType::Equation { equation } => BlockKind::Equation {
            expression: equation.expression,
        },
        BlockType::Divider { .. } => BlockKind::Divider,
        BlockType::Breadcrumb { .. } => BlockKind::Breadcrumb,
        BlockType::TableOfContents { .. } => BlockKind::TableOfContents,
        BlockType::Bookmark { bookmark } => BlockKind::Bookmark {
            url: bookmark.url,
            caption: convert_rich_text_array(bookmark.caption),
        },
        BlockType::Embed { embed } => BlockKind::Embed { url: embed.url },
        BlockType::LinkPreview { link_preview } => BlockKind::LinkPreview {
            url: link_preview.url,
        },
        BlockType::ChildPage { child_page } => BlockKind::ChildPage {
            title: child_page.title,
        },
        BlockType::ChildDatabase { child_database } => BlockKind::ChildDatabase {
            title: child_database.title,
        },
        BlockType::LinkToPage { link_to_page } => BlockKind::LinkToPage {
            target_id: match link_to_page {
                notion_client::objects::parent::Parent::PageId { page_id } => Some(page_id),
                notion_client::objects::parent::Parent::DatabaseId { database_id } => {
                    Some(database_id)
                }
                _ => None,
            },
        },
        BlockType::Image { image } => BlockKind::Media {
            media: MediaKind::Image,
            url: Some(file_url(image.file_type)),
            caption: caption_from_json(raw, type_name),
        },
        BlockType::Video { video } => BlockKind::Media {
            media: MediaKind::Video,
            url: Some(file_url(video.file_type)),
            caption: caption_from_json(raw, type_name),
        },
        BlockType::File { file } => BlockKind::Media {
            media: MediaKind::File,
            url: Some(file_url(file.file_type)),
            caption: convert_rich_text_array(file.caption),
        },
        BlockType::Pdf { pdf } => BlockKind::Media {
            media: MediaKind::Pdf,
            url: Some(file_url(pdf.file_type)),
            caption: convert_rich_text_array(pdf.caption),
        },
        BlockType::Table { table } => BlockKind::Table {
            width: table.table_width as usize,
            has_column_header: table.has_column_header,
        },
        BlockType::TableRow { table_row } => BlockKind::TableRow {
            cells: table_row
                .cells
                .into_iter()
                .map(convert_rich_text_array)
                .collect(),
        },
        BlockType::ColumnList { .. } => BlockKind::ColumnList,
        BlockType::Column { .. } => BlockKind::Column,
        BlockType::SyncedBlock { .. } => BlockKind::Synced,
        BlockType::Template { template } => BlockKind::Template {
            text: convert_rich_text_array(template.rich_text),
        },
        _ => unsupported_block(type_name, raw),
    };

    Ok(Block { common, kind })
}

/// Prefers the wire name of the language ("rust", "plain text") over the
/// Debug name of the notion-client enum.
fn code_language(raw: &Value, debug_name: &str) -> String {
    raw.get("code")
        .and_then(|code| code.get("language"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| debug_name.to_lowercase())
}

/// Image and video captions are not exposed by notion-client.
fn caption_from_json(raw: &Value, type_name: &str) -> Vec<RichTextItem> {
    raw.get(type_name)
        .and_then(|payload| payload.get("caption"))
        .cloned()
        .and_then(|caption| {
            serde_json::from_value::<Vec<notion_client::objects::rich_text::RichText>>(caption)
                .ok()
        })
        .map(convert_rich_text_array)
        .unwrap_or_default()
}

fn convert_block_common(
    notion_block: &notion_client::objects::block::Block,
) -> Result<BlockCommon, AppError> {
    let id = BlockId::parse(&notion_block.id.clone().ok_or_else(|| {
        AppError::MalformedResponse("Block missing required ID field".to_string())
    })?)?;

    let mut common = BlockCommon::new(id);
    common.has_children = notion_block.has_children.unwrap_or(false);
    common.archived = notion_block.archived.unwrap_or(false);
    Ok(common)
}

fn file_url(file: notion_client::objects::file::File) -> String {
    use notion_client::objects::file::File as NcFile;

    match file {
        NcFile::External { external } => external.url,
        NcFile::File { file } => file.url,
    }
}

fn convert_icon(icon: notion_client::objects::block::Icon) -> Option<String> {
    use notion_client::objects::block::Icon as NcIcon;

    match icon {
        NcIcon::Emoji(notion_client::objects::emoji::Emoji::Emoji { emoji }) => Some(emoji),
        // File icons have no textual form
        NcIcon::File(_) => None,
    }
}

pub(crate) fn convert_rich_text_array(
    rich_texts: Vec<notion_client::objects::rich_text::RichText>,
) -> Vec<RichTextItem> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

fn convert_rich_text(rich_text: notion_client::objects::rich_text::RichText) -> RichTextItem {
    use notion_client::objects::rich_text::RichText as NcRichText;

    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => {
            let plain_text = plain_text.unwrap_or_else(|| text.content.clone());
            RichTextItem {
                kind: RichTextKind::Text {
                    content: text.content,
                    link: text.link.map(|link| link.url),
                },
                annotations: annotations.map(convert_annotations).unwrap_or_default(),
                plain_text,
                href,
            }
        }
        NcRichText::Mention {
            mention,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            kind: RichTextKind::Mention {
                mention_type: mention_type_name(&mention),
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },
        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => RichTextItem {
            kind: RichTextKind::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        },
        _ => {
            log::debug!("Unsupported rich text type, dropping run");
            RichTextItem::plain_text("")
        }
    }
}

fn mention_type_name(mention: &notion_client::objects::rich_text::Mention) -> String {
    use notion_client::objects::rich_text::Mention as NcMention;

    match mention {
        NcMention::User { .. } => "user",
        NcMention::Page { .. } => "page",
        NcMention::Database { .. } => "database",
        NcMention::Date { .. } => "date",
        NcMention::LinkPreview { .. } => "link_preview",
        _ => "other",
    }
    .to_string()
}

fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
    }
}

//! Wire types for the page-creation payload and the fixed draft page the
//! job publishes.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageRequest {
    pub parent: Parent,
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Parent {
    pub database_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Select(SelectOption),
    MultiSelect(Vec<SelectOption>),
    Date(DateRange),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RichText {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub text: TextContent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DateRange {
    pub start: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cover {
    External { url: String },
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: None,
            text: TextContent {
                content: content.into(),
            },
        }
    }

    pub fn typed(content: impl Into<String>) -> Self {
        Self {
            kind: Some("text"),
            ..Self::plain(content)
        }
    }
}

impl PropertyValue {
    pub fn title(content: impl Into<String>) -> Self {
        Self::Title(vec![RichText::plain(content)])
    }

    pub fn rich_text(content: impl Into<String>) -> Self {
        Self::RichText(vec![RichText::plain(content)])
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::Select(SelectOption { name: name.into() })
    }

    pub fn date(start: impl Into<String>) -> Self {
        Self::Date(DateRange {
            start: start.into(),
        })
    }
}

/// The draft blog post created on every run.
pub fn draft_page(database_id: impl Into<String>) -> PageRequest {
    let properties = [
        (
            "Title",
            PropertyValue::title("Harnessing Quiet Tech: Open-Source, Subtle AI, and Viral Reach"),
        ),
        (
            "Slug",
            PropertyValue::rich_text("harnessing-quiet-tech-open-source-subtle-ai-and-viral-reach"),
        ),
        (
            "Short Description",
            PropertyValue::rich_text(
                "Explore how businesses can leverage open-source tools and understated AI startups.",
            ),
        ),
        ("Category", PropertyValue::select("Keyword Research")),
        ("Tags", PropertyValue::MultiSelect(Vec::new())),
        ("Publication Date", PropertyValue::date("2025-06-07T20:00:00Z")),
        ("Status", PropertyValue::select("Draft")),
        (
            "Full Description",
            PropertyValue::RichText(vec![RichText::typed(
                "<h1>Harnessing Quiet Tech</h1><p>Full post content here...</p>",
            )]),
        ),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_owned(), value))
    .collect();

    PageRequest {
        parent: Parent {
            database_id: database_id.into(),
        },
        properties,
        cover: Some(Cover::External {
            url: "https://yourcdn.com/path-to-image.jpg".to_owned(),
        }),
    }
}

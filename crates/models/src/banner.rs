use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

pub const DEFAULT_TAG: &str = "NUEVO";
pub const DEFAULT_BACKGROUND: &str = "bg-green-600";
pub const DEFAULT_TEXT_STYLE: &str = "text-white";
pub const DEFAULT_BUTTON_LABEL: &str = "VER MÁS";
pub const DEFAULT_LINK: &str = "/productos";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "banner")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub tag: String,
    pub image: String,
    pub background_style: String,
    pub text_style: String,
    pub button_label: String,
    pub link: String,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Banner fields; `new` fills the styling columns with their defaults.
#[derive(Clone, Debug)]
pub struct NewBanner {
    pub title: String,
    pub subtitle: String,
    pub tag: String,
    pub image: String,
    pub background_style: String,
    pub text_style: String,
    pub button_label: String,
    pub link: String,
    pub active: bool,
}

impl NewBanner {
    pub fn new(title: &str, subtitle: &str, image: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            tag: DEFAULT_TAG.to_string(),
            image: image.to_string(),
            background_style: DEFAULT_BACKGROUND.to_string(),
            text_style: DEFAULT_TEXT_STYLE.to_string(),
            button_label: DEFAULT_BUTTON_LABEL.to_string(),
            link: DEFAULT_LINK.to_string(),
            active: true,
        }
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewBanner) -> Result<Model, errors::ModelError> {
    if input.title.trim().is_empty() { return Err(errors::ModelError::Validation("title required".into())); }
    let am = ActiveModel {
        title: Set(input.title),
        subtitle: Set(input.subtitle),
        tag: Set(input.tag),
        image: Set(input.image),
        background_style: Set(input.background_style),
        text_style: Set(input.text_style),
        button_label: Set(input.button_label),
        link: Set(input.link),
        active: Set(input.active),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Looks a banner up by title and inserts `input` only when it is missing.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, input: NewBanner) -> Result<(Model, bool), errors::ModelError> {
    if let Some(existing) = Entity::find().filter(Column::Title.eq(input.title.as_str())).one(db).await? {
        return Ok((existing, false));
    }
    Ok((create(db, input).await?, true))
}

use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::ProductOption;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_option")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductOption {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            name: model.name,
            description: model.description,
        }
    }
}

impl From<ProductOption> for ActiveModel {
    fn from(option: ProductOption) -> Self {
        ActiveModel {
            id: Set(option.id),
            product_id: Set(option.product_id),
            name: Set(option.name),
            description: Set(option.description),
        }
    }
}

/// The columns written by an update; key and owner are left unset.
pub fn update_columns(option: &ProductOption) -> ActiveModel {
    ActiveModel {
        name: Set(option.name.clone()),
        description: Set(option.description.clone()),
        ..Default::default()
    }
}

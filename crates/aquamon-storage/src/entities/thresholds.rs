use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "thresholds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub sal_low: f64,
    pub sal_high: f64,
    pub ph_low: f64,
    pub ph_high: f64,
    pub temp_low: f64,
    pub temp_high: f64,
    pub bat_low: f64,
    pub offline_minutes: i32,
    pub updated_at: DateTimeWithTimeZone,
    pub updated_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::UpdatedBy",
        to = "super::admin::Column::Id"
    )]
    Admin,
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

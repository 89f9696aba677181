use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DbErr, EntityTrait};
use serde::Serialize;

use crate::entities::thresholds::{self, Column, Entity};
use crate::error::{Result, StorageError};
use crate::store::Store;

/// Fixed id of the threshold singleton row.
pub const SINGLETON_ID: i32 = 1;

/// Seed values: (sal_low, sal_high, ph_low, ph_high, temp_low, temp_high,
/// bat_low, offline_minutes).
pub const DEFAULTS: (f64, f64, f64, f64, f64, f64, f64, i32) =
    (8.0, 12.0, 6.5, 8.5, 25.0, 32.0, 20.0, 10);

/// The threshold configuration row. `updated_by` stays `None` until the
/// first authenticated update.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdsRow {
    pub id: i32,
    pub sal_low: f64,
    pub sal_high: f64,
    pub ph_low: f64,
    pub ph_high: f64,
    pub temp_low: f64,
    pub temp_high: f64,
    pub bat_low: f64,
    pub offline_minutes: i32,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i32>,
}

/// Validated field set for an update. Coercion from loose JSON input happens
/// in the HTTP layer; by the time values reach the store they are plain
/// numbers.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdsUpdate {
    pub sal_low: f64,
    pub sal_high: f64,
    pub ph_low: f64,
    pub ph_high: f64,
    pub temp_low: f64,
    pub temp_high: f64,
    pub bat_low: f64,
    pub offline_minutes: i32,
}

fn to_row(m: thresholds::Model) -> ThresholdsRow {
    ThresholdsRow {
        id: m.id,
        sal_low: m.sal_low,
        sal_high: m.sal_high,
        ph_low: m.ph_low,
        ph_high: m.ph_high,
        temp_low: m.temp_low,
        temp_high: m.temp_high,
        bat_low: m.bat_low,
        offline_minutes: m.offline_minutes,
        updated_at: m.updated_at.with_timezone(&Utc),
        updated_by: m.updated_by,
    }
}

impl Store {
    /// Returns the threshold singleton, creating it with the default bounds
    /// if absent. The insert uses `ON CONFLICT DO NOTHING` keyed on the fixed
    /// id, so concurrent first access can never produce a second row.
    pub async fn get_or_seed_thresholds(&self) -> Result<ThresholdsRow> {
        if let Some(model) = Entity::find_by_id(SINGLETON_ID).one(self.db()).await? {
            return Ok(to_row(model));
        }

        let (sal_low, sal_high, ph_low, ph_high, temp_low, temp_high, bat_low, offline_minutes) =
            DEFAULTS;
        let am = thresholds::ActiveModel {
            id: Set(SINGLETON_ID),
            sal_low: Set(sal_low),
            sal_high: Set(sal_high),
            ph_low: Set(ph_low),
            ph_high: Set(ph_high),
            temp_low: Set(temp_low),
            temp_high: Set(temp_high),
            bat_low: Set(bat_low),
            offline_minutes: Set(offline_minutes),
            updated_at: Set(Utc::now().fixed_offset()),
            updated_by: Set(None),
        };
        let insert = Entity::insert(am)
            .on_conflict(OnConflict::column(Column::Id).do_nothing().to_owned())
            .exec(self.db())
            .await;
        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }
        tracing::info!(id = SINGLETON_ID, "Seeded default thresholds");

        let model = Entity::find_by_id(SINGLETON_ID)
            .one(self.db())
            .await?
            .ok_or(StorageError::SeedReadback {
                entity: "thresholds",
            })?;
        Ok(to_row(model))
    }

    /// Overwrites every configurable field, stamping `updated_at` with the
    /// current time and `updated_by` with the caller's admin id. Returns the
    /// updated row.
    pub async fn update_thresholds(
        &self,
        update: ThresholdsUpdate,
        updated_by: i32,
    ) -> Result<ThresholdsRow> {
        // Make sure the singleton exists before updating it.
        self.get_or_seed_thresholds().await?;

        let am = thresholds::ActiveModel {
            id: Set(SINGLETON_ID),
            sal_low: Set(update.sal_low),
            sal_high: Set(update.sal_high),
            ph_low: Set(update.ph_low),
            ph_high: Set(update.ph_high),
            temp_low: Set(update.temp_low),
            temp_high: Set(update.temp_high),
            bat_low: Set(update.bat_low),
            offline_minutes: Set(update.offline_minutes),
            updated_at: Set(Utc::now().fixed_offset()),
            updated_by: Set(Some(updated_by)),
        };
        let model = am.update(self.db()).await?;
        Ok(to_row(model))
    }
}

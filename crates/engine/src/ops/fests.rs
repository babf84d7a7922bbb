use chrono::NaiveDate;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, Fest, FestSelection, MoneyCents, ResultEngine, cocktails, fest_cocktails, fests,
    util::{format_fest_date, normalize_name, parse_fest_date},
};

use super::{Engine, cocktails::find_cocktail, with_tx};

impl Engine {
    /// Creates the fest if it does not exist yet.
    pub async fn ensure_fest(&self, date: NaiveDate) -> ResultEngine<()> {
        ensure_fest_row(&self.database, &format_fest_date(date)).await
    }

    /// A fest and its selected cocktails.
    pub async fn fest(&self, date: NaiveDate) -> ResultEngine<Fest> {
        let key = format_fest_date(date);
        if fests::Entity::find_by_id(key.clone())
            .one(&self.database)
            .await?
            .is_none()
        {
            return Err(EngineError::KeyNotFound(format!("fest {key}")));
        }

        let rows = fest_cocktails::Entity::find()
            .filter(fest_cocktails::Column::FestDate.eq(key))
            .find_also_related(cocktails::Entity)
            .all(&self.database)
            .await?;

        let mut fest = Fest::new(date);
        for (selection, cocktail) in rows {
            let Some(cocktail) = cocktail else { continue };
            let planned = u32::try_from(selection.amount).map_err(|_| {
                EngineError::InvalidAmount(format!(
                    "stored amount {} for {}",
                    selection.amount, cocktail.name
                ))
            })?;
            fest.selections.insert(
                cocktail.name,
                FestSelection {
                    planned,
                    price: MoneyCents::new(selection.price),
                },
            );
        }
        Ok(fest)
    }

    /// Dates of all fests, newest first.
    pub async fn fest_dates(&self) -> ResultEngine<Vec<NaiveDate>> {
        let mut dates = fests::Entity::find()
            .all(&self.database)
            .await?
            .iter()
            .map(|model| parse_fest_date(&model.date))
            .collect::<ResultEngine<Vec<_>>>()?;
        dates.sort_unstable_by(|a, b| b.cmp(a));
        Ok(dates)
    }

    /// Selects, updates or deselects a cocktail for a fest.
    ///
    /// - `delete == true`: removes the selection if present, otherwise does
    ///   nothing.
    /// - `delete == false`: overwrites price and planned amount of an existing
    ///   selection, or inserts a new one (creating the fest if needed).
    pub async fn set_fest_cocktail(
        &self,
        date: NaiveDate,
        cocktail: &str,
        price: MoneyCents,
        planned: u32,
        delete: bool,
    ) -> ResultEngine<()> {
        let name = normalize_name(cocktail, "cocktail")?;
        if price.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "price of '{name}' must be >= 0"
            )));
        }
        let fest_date = format_fest_date(date);

        with_tx!(self, |db_tx| {
            let Some(cocktail) = find_cocktail(&db_tx, &name).await? else {
                if delete {
                    return Ok(());
                }
                return Err(EngineError::KeyNotFound(name));
            };

            let key = (fest_date.clone(), cocktail.id.clone());
            let existing = fest_cocktails::Entity::find_by_id(key.clone())
                .one(&db_tx)
                .await?;

            match (existing, delete) {
                (Some(_), true) => {
                    fest_cocktails::Entity::delete_by_id(key).exec(&db_tx).await?;
                }
                (None, true) => {}
                (Some(row), false) => {
                    let mut active: fest_cocktails::ActiveModel = row.into();
                    active.price = ActiveValue::Set(price.cents());
                    active.amount = ActiveValue::Set(i64::from(planned));
                    active.update(&db_tx).await?;
                }
                (None, false) => {
                    ensure_fest_row(&db_tx, &fest_date).await?;
                    fest_cocktails::ActiveModel {
                        fest_date: ActiveValue::Set(fest_date.clone()),
                        cocktail_id: ActiveValue::Set(cocktail.id),
                        price: ActiveValue::Set(price.cents()),
                        amount: ActiveValue::Set(i64::from(planned)),
                    }
                    .insert(&db_tx)
                    .await?;
                }
            }
            Ok(())
        })
    }
}

async fn ensure_fest_row<C: ConnectionTrait>(db: &C, date: &str) -> ResultEngine<()> {
    if fests::Entity::find_by_id(date.to_string())
        .one(db)
        .await?
        .is_none()
    {
        fests::ActiveModel {
            date: ActiveValue::Set(date.to_string()),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

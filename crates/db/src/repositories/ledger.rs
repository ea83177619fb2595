//! PostgreSQL ledger store.
//!
//! `begin` opens a `SERIALIZABLE` transaction, locks the ledger row with
//! `SELECT ... FOR UPDATE` and loads the whole book. `commit` writes back
//! only the rows that differ from what was loaded.

use std::collections::BTreeMap;

use async_trait::async_trait;
use ledgerclose_core::currency::ExchangeRate;
use ledgerclose_core::ledger::LedgerBook;
use ledgerclose_core::store::{LedgerStore, StoreError};
use ledgerclose_shared::types::LedgerNumber;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, IsolationLevel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{debug, info};

use super::mapping::{
    account_from_model, account_to_active, batch_from_rows, batch_to_active, changes,
    cost_centre_from_model, cost_centre_to_active, flag_from_model, flag_to_active,
    glm_from_rows, glm_to_active, ledger_from_model, ledger_to_active, period_from_model,
    period_to_active, rate_from_model, rate_to_active,
};
use crate::entities::{
    accounting_periods, accounts, batches, cost_centres, exchange_rates, glm, glm_periods,
    journal_lines, ledger_flags, ledgers,
};

/// Rows per multi-row insert; keeps statements under the bind parameter limit.
const INSERT_CHUNK: usize = 1000;

/// SQLSTATE raised when a serializable transaction loses a conflict.
const SERIALIZATION_FAILURE: &str = "40001";

/// Ledger store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct SeaOrmLedgerStore {
    db: DatabaseConnection,
}

/// Open transaction together with the book as it was loaded.
pub struct SeaOrmTx {
    txn: DatabaseTransaction,
    original: LedgerBook,
}

impl SeaOrmLedgerStore {
    /// Creates a new ledger store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(txn: &DatabaseTransaction, number: LedgerNumber) -> Result<LedgerBook, StoreError> {
        let n = number.value();

        let header = ledgers::Entity::find_by_id(n)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(|e| classify(number, e))?
            .ok_or(StoreError::LedgerNotFound(number))?;
        let ledger = ledger_from_model(header);
        let total = usize::try_from(ledger.total_periods()).unwrap_or(0);

        let periods = accounting_periods::Entity::find()
            .filter(accounting_periods::Column::LedgerNumber.eq(n))
            .order_by_asc(accounting_periods::Column::PeriodNumber)
            .all(txn)
            .await
            .map_err(backend)?
            .into_iter()
            .map(period_from_model)
            .collect::<Result<Vec<_>, _>>()?;

        let mut book = LedgerBook::new(ledger, periods);

        for row in accounts::Entity::find()
            .filter(accounts::Column::LedgerNumber.eq(n))
            .all(txn)
            .await
            .map_err(backend)?
        {
            book.add_account(account_from_model(row)?);
        }

        for row in cost_centres::Entity::find()
            .filter(cost_centres::Column::LedgerNumber.eq(n))
            .all(txn)
            .await
            .map_err(backend)?
        {
            book.add_cost_centre(cost_centre_from_model(row)?);
        }

        for row in exchange_rates::Entity::find()
            .filter(exchange_rates::Column::LedgerNumber.eq(n))
            .order_by_asc(exchange_rates::Column::EffectiveDate)
            .all(txn)
            .await
            .map_err(backend)?
        {
            book.add_exchange_rate(rate_from_model(row)?);
        }

        for row in ledger_flags::Entity::find()
            .filter(ledger_flags::Column::LedgerNumber.eq(n))
            .all(txn)
            .await
            .map_err(backend)?
        {
            book.set_flag(flag_from_model(&row)?);
        }

        let mut lines: BTreeMap<i32, Vec<journal_lines::Model>> = BTreeMap::new();
        for row in journal_lines::Entity::find()
            .filter(journal_lines::Column::LedgerNumber.eq(n))
            .all(txn)
            .await
            .map_err(backend)?
        {
            lines.entry(row.batch_number).or_default().push(row);
        }
        for row in batches::Entity::find()
            .filter(batches::Column::LedgerNumber.eq(n))
            .all(txn)
            .await
            .map_err(backend)?
        {
            let batch_lines = lines.remove(&row.batch_number).unwrap_or_default();
            let batch = batch_from_rows(row, batch_lines)?;
            book.batches.insert(batch.number, batch);
        }

        let mut period_rows: BTreeMap<(i32, String, String), Vec<glm_periods::Model>> =
            BTreeMap::new();
        for row in glm_periods::Entity::find()
            .filter(glm_periods::Column::LedgerNumber.eq(n))
            .all(txn)
            .await
            .map_err(backend)?
        {
            let key = (row.year, row.account_code.clone(), row.cost_centre_code.clone());
            period_rows.entry(key).or_default().push(row);
        }
        for row in glm::Entity::find()
            .filter(glm::Column::LedgerNumber.eq(n))
            .all(txn)
            .await
            .map_err(backend)?
        {
            let key = (row.year, row.account_code.clone(), row.cost_centre_code.clone());
            let rows = period_rows.remove(&key).unwrap_or_default();
            let record = glm_from_rows(row, &rows, total);
            book.balances.insert(record.key.clone(), record);
        }

        Ok(book)
    }

    /// Writes the difference between `before` and `after`.
    async fn write(
        txn: &DatabaseTransaction,
        before: &LedgerBook,
        after: &LedgerBook,
    ) -> Result<(), DbErr> {
        let number = after.number();
        let n = number.value();

        if before.ledger != after.ledger {
            ledger_to_active(&after.ledger).update(txn).await?;
        }

        // Periods
        let old: BTreeMap<i32, _> = before.periods.iter().map(|p| (p.number, p)).collect();
        let new: BTreeMap<i32, _> = after.periods.iter().map(|p| (p.number, p)).collect();
        let diff = changes(&old, &new);
        for period in diff.stale {
            accounting_periods::Entity::delete_many()
                .filter(accounting_periods::Column::LedgerNumber.eq(n))
                .filter(accounting_periods::Column::PeriodNumber.eq(*period))
                .exec(txn)
                .await?;
        }
        insert_all(
            txn,
            diff.fresh.into_iter().map(|p| period_to_active(number, p)).collect(),
        )
        .await?;

        // Accounts and cost centres
        let diff = changes(&before.accounts, &after.accounts);
        for code in diff.stale {
            accounts::Entity::delete_many()
                .filter(accounts::Column::LedgerNumber.eq(n))
                .filter(accounts::Column::Code.eq(code.as_str()))
                .exec(txn)
                .await?;
        }
        insert_all(
            txn,
            diff.fresh.into_iter().map(|a| account_to_active(number, a)).collect(),
        )
        .await?;

        let diff = changes(&before.cost_centres, &after.cost_centres);
        for code in diff.stale {
            cost_centres::Entity::delete_many()
                .filter(cost_centres::Column::LedgerNumber.eq(n))
                .filter(cost_centres::Column::Code.eq(code.as_str()))
                .exec(txn)
                .await?;
        }
        insert_all(
            txn,
            diff.fresh
                .into_iter()
                .map(|c| cost_centre_to_active(number, c))
                .collect(),
        )
        .await?;

        // Exchange rates
        let key = |r: &ExchangeRate| {
            (
                r.from_currency.to_string(),
                r.to_currency.to_string(),
                r.rate_type.as_str(),
                r.effective_date,
            )
        };
        let old: BTreeMap<_, _> = before.exchange_rates.iter().map(|r| (key(r), r)).collect();
        let new: BTreeMap<_, _> = after.exchange_rates.iter().map(|r| (key(r), r)).collect();
        let diff = changes(&old, &new);
        for (from, to, rate_type, date) in diff.stale {
            exchange_rates::Entity::delete_many()
                .filter(exchange_rates::Column::LedgerNumber.eq(n))
                .filter(exchange_rates::Column::FromCurrency.eq(from.as_str()))
                .filter(exchange_rates::Column::ToCurrency.eq(to.as_str()))
                .filter(exchange_rates::Column::RateType.eq(*rate_type))
                .filter(exchange_rates::Column::EffectiveDate.eq(*date))
                .exec(txn)
                .await?;
        }
        insert_all(
            txn,
            diff.fresh.into_iter().map(|r| rate_to_active(number, r)).collect(),
        )
        .await?;

        // Batches; lines follow their batch
        let diff = changes(&before.batches, &after.batches);
        for batch in diff.stale {
            batches::Entity::delete_many()
                .filter(batches::Column::LedgerNumber.eq(n))
                .filter(batches::Column::BatchNumber.eq(batch.value()))
                .exec(txn)
                .await?;
        }
        let mut headers = Vec::new();
        let mut lines = Vec::new();
        for batch in diff.fresh {
            let (header, batch_lines) = batch_to_active(number, batch);
            headers.push(header);
            lines.extend(batch_lines);
        }
        insert_all(txn, headers).await?;
        insert_all(txn, lines).await?;

        // General ledger master; period rows follow their record
        let diff = changes(&before.balances, &after.balances);
        for key in diff.stale {
            glm::Entity::delete_many()
                .filter(glm::Column::LedgerNumber.eq(n))
                .filter(glm::Column::Year.eq(key.year))
                .filter(glm::Column::AccountCode.eq(key.account.as_str()))
                .filter(glm::Column::CostCentreCode.eq(key.cost_centre.as_str()))
                .exec(txn)
                .await?;
        }
        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for record in diff.fresh {
            let (header, period_rows) = glm_to_active(number, record);
            headers.push(header);
            rows.extend(period_rows);
        }
        insert_all(txn, headers).await?;
        insert_all(txn, rows).await?;

        // Flags
        for flag in before.flags.difference(&after.flags) {
            ledger_flags::Entity::delete_many()
                .filter(ledger_flags::Column::LedgerNumber.eq(n))
                .filter(ledger_flags::Column::Flag.eq(flag.key()))
                .exec(txn)
                .await?;
        }
        insert_all(
            txn,
            after
                .flags
                .difference(&before.flags)
                .map(|f| flag_to_active(number, *f))
                .collect(),
        )
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    type Tx = SeaOrmTx;

    async fn create(&self, book: &LedgerBook) -> Result<(), StoreError> {
        let number = book.number();
        let txn = self.db.begin().await.map_err(backend)?;

        let exists = ledgers::Entity::find_by_id(number.value())
            .one(&txn)
            .await
            .map_err(backend)?
            .is_some();
        if exists {
            txn.rollback().await.map_err(backend)?;
            return Err(StoreError::AlreadyExists(number));
        }

        ledger_to_active(&book.ledger)
            .insert(&txn)
            .await
            .map_err(backend)?;

        let empty = LedgerBook::new(book.ledger.clone(), Vec::new());
        Self::write(&txn, &empty, book).await.map_err(backend)?;
        txn.commit().await.map_err(backend)?;

        info!(ledger = %number, "Ledger stored");
        Ok(())
    }

    async fn begin(&self, ledger: LedgerNumber) -> Result<(SeaOrmTx, LedgerBook), StoreError> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await
            .map_err(backend)?;

        match Self::load(&txn, ledger).await {
            Ok(book) => {
                debug!(ledger = %ledger, batches = book.batches.len(), "Ledger loaded");
                Ok((
                    SeaOrmTx {
                        txn,
                        original: book.clone(),
                    },
                    book,
                ))
            }
            Err(e) => {
                txn.rollback().await.map_err(backend)?;
                Err(e)
            }
        }
    }

    async fn commit(&self, tx: SeaOrmTx, book: &LedgerBook) -> Result<(), StoreError> {
        let number = book.number();
        let SeaOrmTx { txn, original } = tx;

        if let Err(e) = Self::write(&txn, &original, book).await {
            txn.rollback().await.map_err(backend)?;
            return Err(classify(number, e));
        }
        txn.commit().await.map_err(|e| classify(number, e))
    }

    async fn rollback(&self, tx: SeaOrmTx) -> Result<(), StoreError> {
        tx.txn.rollback().await.map_err(backend)
    }
}

async fn insert_all<A>(txn: &DatabaseTransaction, models: Vec<A>) -> Result<(), DbErr>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let mut models = models.into_iter().peekable();
    while models.peek().is_some() {
        let chunk: Vec<A> = models.by_ref().take(INSERT_CHUNK).collect();
        <A::Entity as EntityTrait>::insert_many(chunk)
            .exec_without_returning(txn)
            .await?;
    }
    Ok(())
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Maps serialization failures to `Conflict`, anything else to `Backend`.
fn classify(ledger: LedgerNumber, err: DbErr) -> StoreError {
    let message = err.to_string();
    if message.contains(SERIALIZATION_FAILURE) || message.contains("could not serialize") {
        StoreError::Conflict(ledger)
    } else {
        StoreError::Backend(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_serialization_failure() {
        let err = DbErr::Custom(
            "error returned from database: could not serialize access due to concurrent update"
                .to_string(),
        );
        assert!(matches!(
            classify(LedgerNumber::new(43), err),
            StoreError::Conflict(_)
        ));

        let err = DbErr::Custom("connection refused".to_string());
        assert!(matches!(
            classify(LedgerNumber::new(43), err),
            StoreError::Backend(_)
        ));
    }
}

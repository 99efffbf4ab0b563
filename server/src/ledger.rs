use crate::{util, ServerError, ToSqlStr};
use rusqlite::{params, Transaction};
use spades_api::{GameId, UserId};

/// Coins granted the first time a user touches their account.
pub const STARTING_BALANCE: i64 = 1000;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Account {
    pub balance: i64,
    pub wins: i64,
    pub losses: i64,
}

fn ensure_account(tx: &Transaction, user_id: UserId) -> Result<(), ServerError> {
    tx.execute(
        "INSERT OR IGNORE INTO account (user_id, balance) VALUES (?, ?)",
        params![user_id.sql(), STARTING_BALANCE],
    )?;
    Ok(())
}

pub fn account(tx: &Transaction, user_id: UserId) -> Result<Account, ServerError> {
    ensure_account(tx, user_id)?;
    Ok(tx.query_row(
        "SELECT balance, wins, losses FROM account WHERE user_id = ?",
        params![user_id.sql()],
        |row| {
            Ok(Account {
                balance: row.get(0)?,
                wins: row.get(1)?,
                losses: row.get(2)?,
            })
        },
    )?)
}

pub fn charge_buy_in(
    tx: &Transaction,
    game_id: GameId,
    user_id: UserId,
    amount: i64,
) -> Result<(), ServerError> {
    if amount == 0 {
        return Ok(());
    }
    if account(tx, user_id)?.balance < amount {
        return Err(ServerError::InsufficientFunds(user_id));
    }
    tx.execute(
        "UPDATE account SET balance = balance - ? WHERE user_id = ?",
        params![amount, user_id.sql()],
    )?;
    tx.execute(
        "INSERT INTO ledger (game_id, user_id, timestamp, amount) VALUES (?, ?, ?, ?)",
        params![game_id.sql(), user_id.sql(), util::timestamp(), -amount],
    )?;
    Ok(())
}

/// Pays the pot for `game_id` out to the winners in equal shares and bumps
/// everyone's win/loss record. Integer division; the house keeps any
/// remainder.
pub fn settle(
    tx: &Transaction,
    game_id: GameId,
    winners: &[UserId],
    losers: &[UserId],
) -> Result<(), ServerError> {
    let pot = -tx.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM ledger WHERE game_id = ? AND amount < 0",
        params![game_id.sql()],
        |row| row.get::<_, i64>(0),
    )?;
    let timestamp = util::timestamp();
    if !winners.is_empty() {
        let share = pot / winners.len() as i64;
        for &user_id in winners {
            ensure_account(tx, user_id)?;
            tx.execute(
                "UPDATE account SET balance = balance + ?, wins = wins + 1 WHERE user_id = ?",
                params![share, user_id.sql()],
            )?;
            if share != 0 {
                tx.execute(
                    "INSERT INTO ledger (game_id, user_id, timestamp, amount) VALUES (?, ?, ?, ?)",
                    params![game_id.sql(), user_id.sql(), timestamp, share],
                )?;
            }
        }
    }
    for &user_id in losers {
        ensure_account(tx, user_id)?;
        tx.execute(
            "UPDATE account SET losses = losses + 1 WHERE user_id = ?",
            params![user_id.sql()],
        )?;
    }
    Ok(())
}

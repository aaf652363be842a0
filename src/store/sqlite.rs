//! SQLite-backed match store.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info};

use super::{MatchStore, Side, SideAggregate, StoreConfig, StoreError};
use crate::models::{Card, CardId, Deck, ElixirCost, MatchRecord, DECK_SIZE, VARIABLE_COST_MARKER};

/// Schema of the card catalog and match history.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Cards (
    CardID INTEGER PRIMARY KEY,
    CardName TEXT NOT NULL UNIQUE,
    ElixirCost NUMERIC NOT NULL
);

CREATE TABLE IF NOT EXISTS Matches (
    Player1Card1 INTEGER NOT NULL,
    Player1Card2 INTEGER NOT NULL,
    Player1Card3 INTEGER NOT NULL,
    Player1Card4 INTEGER NOT NULL,
    Player1Card5 INTEGER NOT NULL,
    Player1Card6 INTEGER NOT NULL,
    Player1Card7 INTEGER NOT NULL,
    Player1Card8 INTEGER NOT NULL,
    Player2Card1 INTEGER NOT NULL,
    Player2Card2 INTEGER NOT NULL,
    Player2Card3 INTEGER NOT NULL,
    Player2Card4 INTEGER NOT NULL,
    Player2Card5 INTEGER NOT NULL,
    Player2Card6 INTEGER NOT NULL,
    Player2Card7 INTEGER NOT NULL,
    Player2Card8 INTEGER NOT NULL,
    Player1Trophies INTEGER NOT NULL,
    Player2Trophies INTEGER NOT NULL,
    Winner INTEGER NOT NULL
);
";

/// Create the `Cards` and `Matches` tables if they do not exist.
pub fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Insert or replace a card in the catalog.
pub fn insert_card(conn: &Connection, card: &Card) -> Result<(), StoreError> {
    let cost = match card.elixir_cost {
        ElixirCost::Fixed(cost) => Value::Real(cost),
        ElixirCost::Variable => Value::Text(VARIABLE_COST_MARKER.to_string()),
    };
    conn.execute(
        "INSERT OR REPLACE INTO Cards (CardID, CardName, ElixirCost) VALUES (?1, ?2, ?3)",
        params![card.id, card.name, cost],
    )?;
    Ok(())
}

/// Append a match to the history.
pub fn insert_match(conn: &Connection, record: &MatchRecord) -> Result<(), StoreError> {
    let columns: Vec<String> = Side::BOTH
        .iter()
        .flat_map(|side| slot_columns(*side))
        .chain([
            "Player1Trophies".to_string(),
            "Player2Trophies".to_string(),
            "Winner".to_string(),
        ])
        .collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO Matches ({}) VALUES ({})",
        columns.join(", "),
        placeholders
    );

    let winner = if record.player1_won {
        Side::A.winner_value()
    } else {
        Side::B.winner_value()
    };
    let values: Vec<i64> = record
        .player1_cards
        .iter()
        .chain(record.player2_cards.iter())
        .copied()
        .chain([record.player1_trophies, record.player2_trophies, winner])
        .collect();

    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// Card slot column names for one side, in slot order.
fn slot_columns(side: Side) -> Vec<String> {
    (1..=DECK_SIZE)
        .map(|slot| format!("{}Card{}", side.column_prefix(), slot))
        .collect()
}

/// Build the aggregate query for one side.
///
/// Returns the SQL and whether a winner parameter follows the deck slots.
fn aggregate_sql(side: Side, aggregate: SideAggregate) -> (String, bool) {
    let slots = slot_columns(side)
        .into_iter()
        .map(|column| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(" AND ");

    let (select, winner_filter) = match aggregate {
        SideAggregate::Occurrences => ("COUNT(*)".to_string(), false),
        SideAggregate::Wins => ("COUNT(*)".to_string(), true),
        SideAggregate::TrophySum => (
            format!("COALESCE(SUM({}Trophies), 0)", side.column_prefix()),
            false,
        ),
    };

    let mut sql = format!("SELECT {} FROM Matches WHERE {}", select, slots);
    if winner_filter {
        sql.push_str(" AND Winner = ?");
    }
    (sql, winner_filter)
}

/// Match store over a single SQLite connection.
///
/// The connection lives as long as the store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        };

        let conn = Connection::open_with_flags(&config.path, flags).map_err(|source| {
            StoreError::Open {
                path: config.path.clone(),
                source,
            }
        })?;

        info!(
            "Opened match store at {:?} (read_only={})",
            config.path, config.read_only
        );
        Ok(Self { conn })
    }

    /// Wrap an already opened connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl MatchStore for SqliteStore {
    fn card_id_by_name(&self, name: &str) -> Result<Option<CardId>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT CardID FROM Cards WHERE CardName = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        debug!("Card {:?} resolved to {:?}", name, id);
        Ok(id)
    }

    fn elixir_cost(&self, id: CardId) -> Result<Option<ElixirCost>, StoreError> {
        let cost = self
            .conn
            .query_row(
                "SELECT ElixirCost FROM Cards WHERE CardID = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(cost)
    }

    fn aggregate(
        &self,
        side: Side,
        deck: &Deck,
        aggregate: SideAggregate,
    ) -> Result<i64, StoreError> {
        if deck.len() != DECK_SIZE {
            return Err(StoreError::IncompleteDeck(deck.len()));
        }

        let (sql, winner_filter) = aggregate_sql(side, aggregate);
        let mut values: Vec<i64> = deck.cards().to_vec();
        if winner_filter {
            values.push(side.winner_value());
        }

        let value: i64 = self
            .conn
            .query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        debug!("{:?} for {} side: {}", aggregate, side, value);
        Ok(value)
    }

    fn cards(&self) -> Result<Vec<Card>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT CardID, CardName, ElixirCost FROM Cards ORDER BY CardID")?;
        let cards = stmt
            .query_map([], |row| {
                Ok(Card {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    elixir_cost: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }
}

// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

use rusqlite::Connection;
use rusqlite::Transaction;
use serde::Serialize;

use crate::error::Fallible;
use crate::scheduler::SessionStats;
use crate::types::problem::Problem;
use crate::types::problem_hash::ProblemHash;
use crate::types::timestamp::Timestamp;

/// Error counters of a problem from earlier sessions.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct History {
    pub total_errors: u32,
    pub last_errors: u32,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating statistics database at {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Return the stored counters of every problem ever saved.
    pub fn history(&self) -> Fallible<HashMap<ProblemHash, History>> {
        let mut history = HashMap::new();
        let mut stmt = self
            .conn
            .prepare("select problem_hash, total_errors, last_errors from problems;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let hash: ProblemHash = row.get(0)?;
            let entry = History {
                total_errors: row.get(1)?,
                last_errors: row.get(2)?,
            };
            history.insert(hash, entry);
        }
        Ok(history)
    }

    /// Save a drill session and the counters of its problems.
    pub fn save_session(
        &mut self,
        started_at: Timestamp,
        ended_at: Timestamp,
        stats: &SessionStats,
        problems: &[Problem],
    ) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        insert_session(&tx, started_at, ended_at, stats)?;
        for problem in problems {
            upsert_problem(&tx, problem)?;
        }
        tx.commit()?;
        log::debug!("Saved {} problems.", problems.len());
        Ok(())
    }

    pub fn session_count(&self) -> Fallible<u32> {
        let sql = "select count(*) from sessions;";
        let count: u32 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// When the most recent session ended, if there was one.
    pub fn last_session(&self) -> Fallible<Option<Timestamp>> {
        let sql = "select ended_at from sessions order by session_id desc limit 1;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

type SessionId = i64;

fn insert_session(
    tx: &Transaction,
    started_at: Timestamp,
    ended_at: Timestamp,
    stats: &SessionStats,
) -> Fallible<SessionId> {
    let sql = "insert into sessions (started_at, ended_at, solved, errors, skipped) values (?, ?, ?, ?, ?) returning session_id;";
    let session_id: SessionId = tx.query_row(
        sql,
        (
            started_at,
            ended_at,
            stats.solved,
            stats.errors,
            stats.skipped,
        ),
        |row| row.get(0),
    )?;
    Ok(session_id)
}

fn upsert_problem(tx: &Transaction, problem: &Problem) -> Fallible<()> {
    let sql = "insert into problems (problem_hash, total_errors, last_errors) values (?, ?, ?) on conflict (problem_hash) do update set total_errors = excluded.total_errors, last_errors = excluded.last_errors;";
    tx.execute(
        sql,
        (problem.hash(), problem.total_errors, problem.last_errors),
    )?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["problems"], |row| row.get(0))?;
    Ok(count > 0)
}

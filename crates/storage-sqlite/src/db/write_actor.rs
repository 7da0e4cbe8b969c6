//! Single-writer actor.
//!
//! SQLite allows one writer at a time, and the ledger's consistency
//! argument requires every balance adjustment to be atomic and serialized.
//! Both follow from funneling all writes through one dedicated connection:
//! jobs queue on an mpsc channel and each runs inside an
//! `immediate_transaction` on that connection. A job that reads, computes,
//! and updates (like `adjust_balance`) therefore executes without any
//! interleaved write.

use diesel::{Connection, SqliteConnection};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use moneta_core::{Error, Result};

type BoxedValue = Box<dyn Any + Send + 'static>;
type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) -> Result<BoxedValue> + Send + 'static>;

struct WriteRequest {
    job: WriteJob,
    reply: oneshot::Sender<Result<BoxedValue>>,
}

/// Cloneable handle submitting jobs to the writer task.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<WriteRequest>,
}

impl WriteHandle {
    /// Runs `job` on the writer connection, inside its own immediate
    /// transaction, and returns its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = WriteRequest {
            job: Box::new(move |conn| job(conn).map(|value| Box::new(value) as BoxedValue)),
            reply: reply_tx,
        };

        self.tx
            .send(request)
            .await
            .map_err(|_| Error::Unexpected("database writer has stopped".to_string()))?;

        match reply_rx.await {
            Ok(result) => result.and_then(|boxed| {
                boxed.downcast::<T>().map(|value| *value).map_err(|_| {
                    Error::Unexpected("database writer returned an unexpected type".to_string())
                })
            }),
            // The writer dropped the reply sender; the job's fate is
            // unknown, surface it as an infrastructure fault.
            Err(_) => Err(Error::Unexpected(
                "database writer dropped the reply channel".to_string(),
            )),
        }
    }
}

/// Spawns the writer task on its own pooled connection.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let mut conn = super::get_connection(&pool)?;
    let (tx, mut rx) = mpsc::channel::<WriteRequest>(256);

    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let outcome: Result<BoxedValue> = conn
                .immediate_transaction::<_, StorageError, _>(|conn| {
                    (request.job)(conn).map_err(StorageError::from)
                })
                .map_err(Into::into);
            // A dropped receiver means the caller went away; the write
            // itself already committed or rolled back.
            let _ = request.reply.send(outcome);
        }
    });

    Ok(WriteHandle { tx })
}

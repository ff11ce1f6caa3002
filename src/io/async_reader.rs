//! Asynchronous CSV reader with batch interface
//!
//! Reads statement commands in batches for the concurrent replay strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → CommandBatch
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord, StatementCommand};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Commands read in one batch, plus the number of rows skipped as malformed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommandBatch {
    pub commands: Vec<StatementCommand>,
    pub malformed: usize,
}

impl CommandBatch {
    /// True once the input is exhausted
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` valid commands
    ///
    /// Malformed rows are logged, counted and skipped; they do not count
    /// towards the batch size. An empty batch means end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> CommandBatch {
        let mut batch = CommandBatch {
            commands: Vec::with_capacity(batch_size),
            malformed: 0,
        };
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.commands.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(command) => batch.commands.push(command),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping invalid statement record");
                        batch.malformed += 1;
                    }
                },
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Skipping unparsable CSV row");
                    batch.malformed += 1;
                }
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal_macros::dec;

    const A: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn csv(rows: &[String]) -> String {
        let mut content = String::from("type,account,amount\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        content
    }

    #[tokio::test]
    async fn test_async_reader_multiple_batches() {
        let content = csv(&[
            format!("deposit,{A},1"),
            format!("deposit,{A},2"),
            format!("deposit,{A},3"),
            format!("withdrawal,{A},4"),
            format!("deposit,{A},5"),
        ]);
        let mut reader = AsyncReader::new(Cursor::new(content.into_bytes()));

        let batch1 = reader.read_batch(2).await;
        assert_eq!(batch1.commands.len(), 2);
        assert_eq!(batch1.commands[0].input.amount, dec!(1));

        let batch2 = reader.read_batch(2).await;
        assert_eq!(batch2.commands.len(), 2);
        assert_eq!(batch2.commands[1].input.amount, dec!(4));

        let batch3 = reader.read_batch(2).await;
        assert_eq!(batch3.commands.len(), 1);

        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut reader = AsyncReader::new(Cursor::new(csv(&[]).into_bytes()));

        let batch = reader.read_batch(10).await;
        assert!(batch.is_empty());
        assert_eq!(batch.malformed, 0);
    }

    #[tokio::test]
    async fn test_async_reader_skips_and_counts_invalid_records() {
        let content = csv(&[
            format!("transfer,{A},1"),
            format!("deposit,{A},-3"),
            format!("deposit,{A},2"),
        ]);
        let mut reader = AsyncReader::new(Cursor::new(content.into_bytes()));

        let batch = reader.read_batch(10).await;

        assert_eq!(batch.commands.len(), 1);
        assert_eq!(batch.commands[0].input.amount, dec!(2));
        assert_eq!(batch.malformed, 2);
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_handling() {
        let content = csv(&[format!("  DEPOSIT  ,  {A}  ,  100.0  ")]);
        let mut reader = AsyncReader::new(Cursor::new(content.into_bytes()));

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.commands.len(), 1);
        assert_eq!(batch.commands[0].account.to_string(), A);
    }
}

use crate::domain::card::CardAccount;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads card accounts from a CSV source for administrative seeding.
///
/// Expected header: `card_number,expiration,cvv,balance,active`. The reader
/// wraps `csv::Reader`, trims whitespace, and yields rows lazily so large
/// seed files stream without loading into memory.
pub struct CardReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CardReader<R> {
    /// Creates a new `CardReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes card rows.
    pub fn cards(self) -> impl Iterator<Item = Result<CardAccount>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}

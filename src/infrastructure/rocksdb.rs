use crate::domain::card::CardAccount;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{CardStore, PaymentStore, TokenStore, TransactionStore};
use crate::domain::token::MobileToken;
use crate::domain::transaction::TransactionRecord;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column Family for card accounts, keyed by card number.
pub const CF_CARDS: &str = "cards";
/// Column Family for payment records, keyed by id.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for transaction records, keyed by id.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for mobile tokens, keyed by id.
pub const CF_TOKENS: &str = "tokens";
/// Column Family for id sequence counters, keyed by record type.
pub const CF_SEQUENCES: &str = "sequences";

/// A persistent store implementation using RocksDB.
///
/// One instance serves every store trait a service needs; each record type
/// lives in its own Column Family. `Clone` shares the underlying `Arc<DB>`,
/// so one opened database can back several stores in one process.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
    // Serializes read-increment-write on the sequence counters.
    sequence_lock: Arc<Mutex<()>>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_CARDS, CF_PAYMENTS, CF_TRANSACTIONS, CF_TOKENS, CF_SEQUENCES]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            sequence_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PaymentError::StorageError(format!("{name} column family not found")))
    }

    fn put_record<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], record: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let value = serde_json::to_vec(record)?;
        self.db.put_cf(&cf, key, value)?;
        Ok(())
    }

    fn get_record<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn all_records<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    fn next_sequence(&self, name: &str) -> Result<u64> {
        let cf = self.cf(CF_SEQUENCES)?;
        let _guard = self
            .sequence_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = match self.db.get_cf(&cf, name.as_bytes())? {
            Some(bytes) => {
                let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    PaymentError::StorageError(format!("corrupt sequence counter for {name}"))
                })?;
                u64::from_be_bytes(bytes)
            }
            None => 0,
        };
        let next = current + 1;
        self.db.put_cf(&cf, name.as_bytes(), next.to_be_bytes())?;
        Ok(next)
    }
}

#[async_trait]
impl CardStore for RocksDbStore {
    async fn store(&self, card: CardAccount) -> Result<()> {
        self.put_record(CF_CARDS, card.card_number.as_bytes(), &card)
    }

    async fn get(&self, card_number: &str) -> Result<Option<CardAccount>> {
        self.get_record(CF_CARDS, card_number.as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<CardAccount>> {
        self.all_records(CF_CARDS)
    }

    async fn delete(&self, card_number: &str) -> Result<()> {
        let cf = self.cf(CF_CARDS)?;
        self.db.delete_cf(&cf, card_number.as_bytes())?;
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for RocksDbStore {
    async fn next_id(&self) -> Result<u64> {
        self.next_sequence(CF_PAYMENTS)
    }

    async fn store(&self, payment: PaymentRecord) -> Result<()> {
        self.put_record(CF_PAYMENTS, &payment.id.to_be_bytes(), &payment)
    }

    async fn get(&self, id: u64) -> Result<Option<PaymentRecord>> {
        self.get_record(CF_PAYMENTS, &id.to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<PaymentRecord>> {
        // Big-endian id keys keep the iteration ordered.
        self.all_records(CF_PAYMENTS)
    }
}

#[async_trait]
impl TransactionStore for RocksDbStore {
    async fn next_id(&self) -> Result<u64> {
        self.next_sequence(CF_TRANSACTIONS)
    }

    async fn store(&self, transaction: TransactionRecord) -> Result<()> {
        self.put_record(CF_TRANSACTIONS, &transaction.id.to_be_bytes(), &transaction)
    }

    async fn get(&self, id: u64) -> Result<Option<TransactionRecord>> {
        self.get_record(CF_TRANSACTIONS, &id.to_be_bytes())
    }

    async fn get_all(&self) -> Result<Vec<TransactionRecord>> {
        self.all_records(CF_TRANSACTIONS)
    }
}

#[async_trait]
impl TokenStore for RocksDbStore {
    async fn next_id(&self) -> Result<u64> {
        self.next_sequence(CF_TOKENS)
    }

    async fn store(&self, token: MobileToken) -> Result<()> {
        self.put_record(CF_TOKENS, &token.id.to_be_bytes(), &token)
    }

    async fn get(&self, id: u64) -> Result<Option<MobileToken>> {
        self.get_record(CF_TOKENS, &id.to_be_bytes())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<MobileToken>> {
        let tokens: Vec<MobileToken> = self.all_records(CF_TOKENS)?;
        Ok(tokens.into_iter().find(|token| token.token_hash == token_hash))
    }
}

use async_trait::async_trait;
use rail_core::repository::BookingRepository;
use rail_core::{BookingRecord, BookingStatus, CoreError, CoreResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-memory stand-in for the booking service's storage.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    records: RwLock<HashMap<Uuid, BookingRecord>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = BookingRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.booking.id, r))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, record: BookingRecord) -> CoreResult<()> {
        record
            .booking
            .validate(&record.passengers)?;

        let mut records = self.records.write().await;
        if records.contains_key(&record.booking.id) {
            return Err(CoreError::ValidationError(format!(
                "booking {} already exists",
                record.booking.id
            )));
        }
        records.insert(record.booking.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CoreResult<Option<BookingRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_by_pnr(&self, pnr: &str) -> CoreResult<Option<BookingRecord>> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.booking.pnr == pnr).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> CoreResult<Vec<BookingRecord>> {
        let records = self.records.read().await;
        let mut owned: Vec<BookingRecord> = records
            .values()
            .filter(|r| r.booking.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.booking
                .journey_date
                .cmp(&a.booking.journey_date)
                .then_with(|| a.booking.pnr.cmp(&b.booking.pnr))
        });
        Ok(owned)
    }

    async fn transition(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> CoreResult<Option<BookingRecord>> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if record.booking.status != expected {
            debug!(
                "Booking {} is {}, not {}; leaving it unchanged",
                record.booking.pnr, record.booking.status, expected
            );
            return Ok(None);
        }

        record.booking.status = next;
        Ok(Some(record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{demo_booking_id, demo_records, DEMO_USER};
    use chrono::NaiveDate;
    use rail_core::FareDetails;

    fn repo() -> InMemoryBookingRepository {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        InMemoryBookingRepository::with_records(demo_records(today, |base| FareDetails::new(base, 5.0, 2.0)))
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_pnr() {
        let repo = repo();

        let by_id = repo.get(demo_booking_id()).await.unwrap().unwrap();
        let by_pnr = repo.find_by_pnr("8203948245").await.unwrap().unwrap();
        assert_eq!(by_id.booking.id, by_pnr.booking.id);
        assert!(repo.find_by_pnr("0000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_per_user() {
        let repo = repo();
        let history = repo.list_for_user(DEMO_USER).await.unwrap();

        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|r| r.booking.user_id == DEMO_USER));
        assert!(history
            .windows(2)
            .all(|w| w[0].booking.journey_date >= w[1].booking.journey_date));
    }

    #[tokio::test]
    async fn test_transition_is_compare_and_set() {
        let repo = repo();
        let id = demo_booking_id();

        let updated = repo
            .transition(id, BookingStatus::Provisional, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(updated.unwrap().booking.status, BookingStatus::Confirmed);

        // Second attempt sees the new status and does nothing
        let again = repo
            .transition(id, BookingStatus::Provisional, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert!(again.is_none());
        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.booking.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_transition_unknown_booking() {
        let result = repo()
            .transition(Uuid::new_v4(), BookingStatus::Provisional, BookingStatus::Cancelled)
            .await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates_and_invalid_records() {
        let repo = InMemoryBookingRepository::new();
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let record = demo_records(today, |base| FareDetails::new(base, 5.0, 2.0)).remove(0);

        repo.insert(record.clone()).await.unwrap();
        assert!(repo.insert(record.clone()).await.is_err());

        let mut empty = record;
        empty.booking.id = Uuid::new_v4();
        empty.passengers.clear();
        assert!(matches!(
            repo.insert(empty).await,
            Err(CoreError::ValidationError(_))
        ));
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use rail_shared::Masked;

/// The signed-in traveller. Identification only; there is no session or
/// credential behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Registry of booking-service endpoints, resolved against one base URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub base_url: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl ApiEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn pnr_status(&self, pnr: &str) -> String {
        self.join(&format!("/api/pnr/{}", pnr))
    }

    pub fn history(&self) -> String {
        self.join("/api/bookings")
    }

    pub fn fare_summary(&self, booking_id: Uuid) -> String {
        self.join(&format!("/api/bookings/{}/fare-summary", booking_id))
    }

    pub fn confirm_payment(&self, booking_id: Uuid) -> String {
        self.join(&format!("/api/bookings/{}/confirm-payment", booking_id))
    }

    pub fn release_booking(&self, booking_id: Uuid) -> String {
        self.join(&format!("/api/bookings/{}/release", booking_id))
    }

    pub fn ticket(&self, pnr: &str) -> String {
        self.join(&format!("/api/tickets/{}", pnr))
    }
}

/// Application context passed down explicitly to whoever needs it.
///
/// Only the owner (holding `&mut`) can change who is signed in; everyone else
/// reads through a shared borrow.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    user: Option<CurrentUser>,
    endpoints: ApiEndpoints,
}

impl AppContext {
    pub fn new(endpoints: ApiEndpoints) -> Self {
        Self { user: None, endpoints }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    pub fn sign_in(&mut self, user: CurrentUser) {
        tracing::info!(user = %Masked(&user.id), "user signed in");
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) -> Option<CurrentUser> {
        self.user.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls_trim_trailing_slash() {
        let endpoints = ApiEndpoints::new("https://rail.test/");
        assert_eq!(endpoints.pnr_status("8203948245"), "https://rail.test/api/pnr/8203948245");
        assert_eq!(endpoints.ticket("8203948245"), "https://rail.test/api/tickets/8203948245");
        assert_eq!(
            endpoints.release_booking(Uuid::nil()),
            "https://rail.test/api/bookings/00000000-0000-0000-0000-000000000000/release"
        );
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut ctx = AppContext::new(ApiEndpoints::default());
        assert!(ctx.user().is_none());

        ctx.sign_in(CurrentUser::new("u-1001"));
        assert_eq!(ctx.user().map(|u| u.id.as_str()), Some("u-1001"));

        let previous = ctx.sign_out();
        assert_eq!(previous, Some(CurrentUser::new("u-1001")));
        assert!(ctx.user().is_none());
    }
}

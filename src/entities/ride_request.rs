use std::fmt;

use chrono::{DateTime, Duration, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};

use super::fields::id;
use crate::error::{invalid_transition_error, Error};

/// A passenger's request for a seat on a ride.
///
/// Requests are never deleted in the normal flow: they start `PENDING` and
/// move through [`Status`] only via [`RideRequest::transition`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, PolarClass)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "id::deserialize")]
    pub ride_id: String,
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub user_id: String,
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub driver_id: String,
    #[serde(deserialize_with = "id::deserialize")]
    pub destination_id: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
    #[serde(rename = "IN PROGRESS", alias = "IN_PROGRESS")]
    InProgress,
    Completed,
    Cancelled,
}

/// The fields a successful transition changes, in the shape the backend
/// expects for a partial update.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RequestStats {
    pub total: usize,
    pub pending: usize,
    /// Accepted and completed requests together.
    pub accepted: usize,
    pub rejected: usize,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::InProgress => "IN PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(&self, target: Status) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Accepted, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl RideRequest {
    pub fn new(
        id: String,
        ride_id: String,
        user_id: String,
        driver_id: String,
        destination_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ride_id,
            user_id,
            driver_id,
            destination_id,
            status: Status::Pending,
            created_at,
            ride_start_time: None,
            completed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Moves the request to `target` on behalf of `actor_id`.
    ///
    /// Only the request's driver may act, and only along the lifecycle
    /// edges. On failure the request is left untouched.
    #[tracing::instrument(skip(self), fields(id = %self.id, from = %self.status))]
    pub fn transition(
        &mut self,
        target: Status,
        actor_id: &str,
        at: DateTime<Utc>,
    ) -> Result<StatusChange, Error> {
        if actor_id != self.driver_id {
            tracing::info!("actor is not the driver of this ride");
            return Err(invalid_transition_error(self.status, target));
        }

        if !self.status.can_transition_to(target) {
            return Err(invalid_transition_error(self.status, target));
        }

        let mut change = StatusChange {
            status: target,
            ride_start_time: None,
            completed_at: None,
        };

        match target {
            Status::InProgress => change.ride_start_time = Some(at),
            Status::Completed | Status::Cancelled => change.completed_at = Some(at),
            _ => (),
        }

        self.apply(&change);

        Ok(change)
    }

    pub fn accept(&mut self, actor_id: &str, at: DateTime<Utc>) -> Result<StatusChange, Error> {
        self.transition(Status::Accepted, actor_id, at)
    }

    pub fn reject(&mut self, actor_id: &str, at: DateTime<Utc>) -> Result<StatusChange, Error> {
        self.transition(Status::Rejected, actor_id, at)
    }

    pub fn start(&mut self, actor_id: &str, at: DateTime<Utc>) -> Result<StatusChange, Error> {
        self.transition(Status::InProgress, actor_id, at)
    }

    pub fn complete(&mut self, actor_id: &str, at: DateTime<Utc>) -> Result<StatusChange, Error> {
        self.transition(Status::Completed, actor_id, at)
    }

    pub fn cancel(&mut self, actor_id: &str, at: DateTime<Utc>) -> Result<StatusChange, Error> {
        self.transition(Status::Cancelled, actor_id, at)
    }

    fn apply(&mut self, change: &StatusChange) {
        self.status = change.status;

        if let Some(at) = change.ride_start_time {
            self.ride_start_time = Some(at);
        }

        if let Some(at) = change.completed_at {
            self.completed_at = Some(at);
        }
    }

    /// Time spent riding: until completion, or until `now` while the ride
    /// is still going. `None` if the ride never started.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let started = self.ride_start_time?;
        let until = self.completed_at.unwrap_or(now);

        Some(std::cmp::max(until - started, Duration::zero()))
    }
}

impl RequestStats {
    pub fn tally<'a>(requests: impl IntoIterator<Item = &'a RideRequest>) -> Self {
        requests
            .into_iter()
            .fold(Self::default(), |mut stats, request| {
                stats.total += 1;

                match request.status {
                    Status::Pending => stats.pending += 1,
                    Status::Accepted | Status::Completed => stats.accepted += 1,
                    Status::Rejected => stats.rejected += 1,
                    Status::InProgress | Status::Cancelled => (),
                }

                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DRIVER: &str = "driver-1";
    const PASSENGER: &str = "passenger-1";

    const ALL: [Status; 6] = [
        Status::Pending,
        Status::Accepted,
        Status::Rejected,
        Status::InProgress,
        Status::Completed,
        Status::Cancelled,
    ];

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 8, minute, 0).unwrap()
    }

    fn request(status: Status) -> RideRequest {
        let mut r = RideRequest::new(
            "rq1".into(),
            "ride1".into(),
            PASSENGER.into(),
            DRIVER.into(),
            "dest1".into(),
            at(0),
        );
        r.status = status;
        r
    }

    #[test]
    fn transition_table_is_exact() {
        let allowed = [
            (Status::Pending, Status::Accepted),
            (Status::Pending, Status::Rejected),
            (Status::Accepted, Status::InProgress),
            (Status::InProgress, Status::Completed),
            (Status::InProgress, Status::Cancelled),
        ];

        for from in ALL {
            for to in ALL {
                let mut r = request(from);
                let before = r.clone();
                let result = r.transition(to, DRIVER, at(5));

                if allowed.contains(&(from, to)) {
                    assert!(result.is_ok(), "{} -> {} should be allowed", from, to);
                    assert_eq!(r.status, to);
                } else {
                    assert!(
                        result.unwrap_err().is_invalid_transition(),
                        "{} -> {} should be refused",
                        from,
                        to
                    );
                    assert_eq!(r, before);
                }
            }
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for from in ALL.into_iter().filter(Status::is_terminal) {
            for to in ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn only_the_driver_moves_a_request() {
        let mut r = request(Status::Pending);

        let err = r.accept(PASSENGER, at(1)).unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(r.status, Status::Pending);

        let err = r.accept("someone-else", at(1)).unwrap_err();
        assert!(err.is_invalid_transition());

        assert!(r.accept(DRIVER, at(1)).is_ok());
        assert!(r.start(PASSENGER, at(2)).is_err());
        assert_eq!(r.status, Status::Accepted);
        assert_eq!(r.ride_start_time, None);
    }

    #[test]
    fn pending_cannot_jump_to_completed() {
        let mut r = request(Status::Pending);
        assert!(r.transition(Status::Completed, DRIVER, at(1)).unwrap_err().is_invalid_transition());
    }

    #[test]
    fn full_ride_records_timestamps() {
        let mut r = request(Status::Pending);

        let change = r.accept(DRIVER, at(1)).unwrap();
        assert_eq!(change.ride_start_time, None);
        assert_eq!(change.completed_at, None);

        let change = r.start(DRIVER, at(10)).unwrap();
        assert_eq!(change.ride_start_time, Some(at(10)));
        assert_eq!(r.elapsed(at(25)), Some(Duration::minutes(15)));

        let change = r.complete(DRIVER, at(40)).unwrap();
        assert_eq!(change.completed_at, Some(at(40)));
        assert_eq!(r.status, Status::Completed);
        assert_eq!(r.ride_start_time, Some(at(10)));
        assert_eq!(r.elapsed(at(59)), Some(Duration::minutes(30)));
    }

    #[test]
    fn cancelling_in_progress_records_completion() {
        let mut r = request(Status::InProgress);
        r.ride_start_time = Some(at(3));

        r.cancel(DRIVER, at(9)).unwrap();
        assert_eq!(r.status, Status::Cancelled);
        assert_eq!(r.completed_at, Some(at(9)));
    }

    #[test]
    fn change_serializes_as_partial_update() {
        let mut r = request(Status::Accepted);
        let change = r.start(DRIVER, at(10)).unwrap();
        let json = serde_json::to_value(&change).unwrap();

        assert_eq!(json["status"], "IN PROGRESS");
        assert!(json.get("rideStartTime").is_some());
        assert!(json.get("completedAt").is_none());
    }

    #[test]
    fn in_progress_spellings() {
        let s: Status = serde_json::from_str("\"IN PROGRESS\"").unwrap();
        assert_eq!(s, Status::InProgress);
        let s: Status = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(s, Status::InProgress);
    }

    #[test]
    fn never_started_has_no_elapsed_time() {
        assert_eq!(request(Status::Accepted).elapsed(at(30)), None);
    }

    #[test]
    fn stats_group_accepted_with_completed() {
        let requests: Vec<RideRequest> = [
            Status::Pending,
            Status::Pending,
            Status::Accepted,
            Status::Completed,
            Status::Rejected,
            Status::Cancelled,
        ]
        .into_iter()
        .map(request)
        .collect();

        let stats = RequestStats::tally(&requests);
        assert_eq!(
            stats,
            RequestStats {
                total: 6,
                pending: 2,
                accepted: 2,
                rejected: 1,
            }
        );
    }
}

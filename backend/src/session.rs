use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;
use uuid::Uuid;

use crate::error::PlanError;
use crate::models::{Location, TripPlan, TripSessionResponse, TripType};

pub const DEFAULT_SESSION_CAPACITY: usize = 1024;

/// One user's evolving trip.
#[derive(Debug, Clone)]
pub struct TripSession {
    pub id: Uuid,
    pub car_id: String,
    pub plan: TripPlan,
    generation: u64,
}

impl TripSession {
    pub fn response(&self) -> TripSessionResponse {
        TripSessionResponse {
            session_id: self.id.to_string(),
            car_id: self.car_id.clone(),
            plan: self.plan.clone(),
        }
    }
}

/// Issued when a replan starts. Only the most recent ticket for a session
/// may commit its result.
#[derive(Debug, Clone)]
pub struct ReplanTicket {
    pub session_id: Uuid,
    pub generation: u64,
    pub car_id: String,
    pub source: Location,
    pub destination: Location,
    pub trip_type: TripType,
}

/// In-memory trip sessions, least recently used evicted first.
pub struct SessionStore {
    sessions: Mutex<LruCache<Uuid, TripSession>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_SESSION_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl SessionStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<Uuid, TripSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create(&self, car_id: impl Into<String>, plan: TripPlan) -> TripSession {
        let session = TripSession {
            id: Uuid::new_v4(),
            car_id: car_id.into(),
            plan,
            generation: 0,
        };
        tracing::debug!("Created trip session {}", session.id);
        self.lock().put(session.id, session.clone());
        session
    }

    pub fn get(&self, id: &str) -> Result<TripSession, PlanError> {
        let id = parse_id(id)?;
        self.lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| PlanError::UnknownSession(id.to_string()))
    }

    /// Apply `change` to a session and return the updated copy.
    ///
    /// A failed change leaves the stored session untouched. A successful one
    /// supersedes any replan still in flight, since that replan was priced
    /// and laid out against the state being replaced here.
    pub fn update<F>(&self, id: &str, change: F) -> Result<TripSession, PlanError>
    where
        F: FnOnce(&mut TripSession) -> Result<(), PlanError>,
    {
        let id = parse_id(id)?;
        let mut sessions = self.lock();
        let stored = sessions
            .get_mut(&id)
            .ok_or_else(|| PlanError::UnknownSession(id.to_string()))?;
        let mut draft = stored.clone();
        change(&mut draft)?;
        draft.generation += 1;
        *stored = draft.clone();
        Ok(draft)
    }

    /// Start a replan, superseding any replan still in flight for the session.
    ///
    /// Fields left as `None` keep the session's current values.
    pub fn begin_replan(
        &self,
        id: &str,
        source: Option<Location>,
        destination: Option<Location>,
        trip_type: Option<TripType>,
    ) -> Result<ReplanTicket, PlanError> {
        let id = parse_id(id)?;
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| PlanError::UnknownSession(id.to_string()))?;
        session.generation += 1;

        Ok(ReplanTicket {
            session_id: id,
            generation: session.generation,
            car_id: session.car_id.clone(),
            source: source.unwrap_or_else(|| session.plan.source.clone()),
            destination: destination.unwrap_or_else(|| session.plan.destination.clone()),
            trip_type: trip_type.unwrap_or(session.plan.trip_type),
        })
    }

    /// Store a replanned trip unless a newer replan has started since `ticket`.
    pub fn commit(&self, ticket: &ReplanTicket, plan: TripPlan) -> Result<TripSession, PlanError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(&ticket.session_id)
            .ok_or_else(|| PlanError::UnknownSession(ticket.session_id.to_string()))?;
        if session.generation != ticket.generation {
            tracing::debug!(
                "Discarding replan {} for {}: generation {} is current",
                ticket.generation,
                ticket.session_id,
                session.generation
            );
            return Err(PlanError::Superseded);
        }
        session.plan = plan;
        Ok(session.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn parse_id(id: &str) -> Result<Uuid, PlanError> {
    Uuid::parse_str(id).map_err(|_| PlanError::UnknownSession(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary;
    use crate::models::{Pricing, RouteData, RoutePoint};

    fn location(name: &str, lat: f64, lng: f64) -> Location {
        Location::new(name, name, lat, lng)
    }

    fn plan(destination: Location) -> TripPlan {
        let source = location("Bengaluru", 12.97, 77.59);
        let route = RouteData {
            coordinates: vec![source.point(), RoutePoint::new(destination.lat, destination.lng)],
            distance_km: 145.0,
            duration_minutes: 180.0,
            toll_info: None,
        };
        let pricing = Pricing {
            base_fare: 3900.0,
            per_km_rate: 12.0,
            driver_allowance_per_day: 300.0,
        };
        let (start, end) = itinerary::endpoint_stops(&source, &destination, TripType::OneWay);
        let stops = itinerary::assemble_stops(start, Vec::new(), Vec::new(), end);
        let trip_stats = itinerary::trip_stats_for(&stops, &route, TripType::OneWay, pricing, None);
        let days = itinerary::group_by_day(&stops, trip_stats.total_days);
        TripPlan {
            source,
            destination,
            trip_type: TripType::OneWay,
            route,
            route_options: Vec::new(),
            selected_route_id: "route-0".into(),
            stops,
            trip_stats,
            days,
            stops_validated: true,
            night_halt_hint: None,
        }
    }

    fn mysuru() -> Location {
        location("Mysuru", 12.30, 76.64)
    }

    #[test]
    fn create_then_get() {
        let store = SessionStore::default();
        let session = store.create("sedan", plan(mysuru()));
        let fetched = store.get(&session.id.to_string()).unwrap();
        assert_eq!(fetched.car_id, "sedan");
        assert_eq!(fetched.plan.destination.name, "Mysuru");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn malformed_and_missing_ids() {
        let store = SessionStore::default();
        assert!(matches!(store.get("not-a-uuid"), Err(PlanError::UnknownSession(_))));
        let missing = Uuid::new_v4().to_string();
        assert!(matches!(store.get(&missing), Err(PlanError::UnknownSession(_))));
    }

    #[test]
    fn latest_replan_wins() {
        let store = SessionStore::default();
        let session = store.create("sedan", plan(mysuru()));
        let id = session.id.to_string();

        let ooty = location("Ooty", 11.41, 76.70);
        let coorg = location("Madikeri", 12.42, 75.74);
        let first = store.begin_replan(&id, None, Some(ooty.clone()), None).unwrap();
        let second = store.begin_replan(&id, None, Some(coorg.clone()), None).unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(second.source.name, "Bengaluru");

        // The later request finishes first; the earlier one must not overwrite it.
        store.commit(&second, plan(coorg)).unwrap();
        assert!(matches!(
            store.commit(&first, plan(ooty)),
            Err(PlanError::Superseded)
        ));
        assert_eq!(store.get(&id).unwrap().plan.destination.name, "Madikeri");
    }

    #[test]
    fn failed_update_leaves_session_untouched() {
        let store = SessionStore::default();
        let session = store.create("sedan", plan(mysuru()));
        let id = session.id.to_string();

        let result = store.update(&id, |session| {
            session.car_id = "suv".into();
            Err(PlanError::UnknownCar("tractor".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.get(&id).unwrap().car_id, "sedan");

        let updated = store
            .update(&id, |session| {
                session.car_id = "suv".into();
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.car_id, "suv");
        assert_eq!(store.get(&id).unwrap().car_id, "suv");
    }

    #[test]
    fn update_supersedes_replan_in_flight() {
        let store = SessionStore::default();
        let session = store.create("sedan", plan(mysuru()));
        let id = session.id.to_string();

        let ticket = store.begin_replan(&id, None, None, None).unwrap();
        assert_eq!(ticket.car_id, "sedan");
        store
            .update(&id, |session| {
                session.car_id = "suv".into();
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            store.commit(&ticket, plan(location("Ooty", 11.41, 76.70))),
            Err(PlanError::Superseded)
        ));
        let stored = store.get(&id).unwrap();
        assert_eq!(stored.car_id, "suv");
        assert_eq!(stored.plan.destination.name, "Mysuru");
    }

    #[test]
    fn failed_update_keeps_replan_ticket_valid() {
        let store = SessionStore::default();
        let session = store.create("sedan", plan(mysuru()));
        let id = session.id.to_string();

        let ticket = store.begin_replan(&id, None, None, None).unwrap();
        let _ = store.update(&id, |_| Err(PlanError::UnknownCar("tractor".into())));
        store.commit(&ticket, plan(location("Ooty", 11.41, 76.70))).unwrap();
        assert_eq!(store.get(&id).unwrap().plan.destination.name, "Ooty");
    }

    #[test]
    fn oldest_sessions_are_evicted() {
        let store = SessionStore::new(NonZeroUsize::new(2).unwrap());
        let first = store.create("sedan", plan(mysuru()));
        store.create("sedan", plan(mysuru()));
        store.create("sedan", plan(mysuru()));
        assert_eq!(store.len(), 2);
        assert!(store.get(&first.id.to_string()).is_err());
    }
}

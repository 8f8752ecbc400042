use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;

use crate::cache::{Clock, SystemClock, TtlCache, DEFAULT_CAPACITY, DEFAULT_TTL_DAYS};
use crate::error::PlanError;
use crate::geo::nearest_route_sample;
use crate::itinerary::{self, detour_for};
use crate::models::{
    Leg, Location, Pricing, RouteData, RouteOption, Stop, StopType, TripPlan, TripType,
};
use crate::providers::{PlaceSearch, RouteProvider, StopSuggester, SuggestionQuery};
use crate::route_mapper::{progress_of_index, RouteMapError};
use crate::suggestions::SuggestionBatch;
use crate::validator::{StopValidator, ValidatorConfig};

const ROUTE_COLORS: [&str; 4] = ["#2563eb", "#16a34a", "#d97706", "#9333ea"];

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub validator: ValidatorConfig,
    pub cache_capacity: NonZeroUsize,
    pub cache_ttl: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            validator: ValidatorConfig::default(),
            cache_capacity: NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            cache_ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }
}

/// Suggestions are reused across trips between the same two places.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SuggestionKey {
    source: String,
    destination: String,
    leg: Leg,
    trip_type: TripType,
}

impl From<&SuggestionQuery> for SuggestionKey {
    fn from(query: &SuggestionQuery) -> Self {
        Self {
            source: query.source.trim().to_lowercase(),
            destination: query.destination.trim().to_lowercase(),
            leg: query.leg,
            trip_type: query.trip_type,
        }
    }
}

#[derive(Debug, Default)]
struct LegStops {
    stops: Vec<Stop>,
    night_halt: Option<String>,
    validated: bool,
}

/// Builds trip plans: route, suggested stops, validation and pricing.
pub struct TripPlanner {
    routes: Arc<dyn RouteProvider>,
    suggester: Arc<dyn StopSuggester>,
    validator: StopValidator,
    suggestion_cache: Mutex<TtlCache<SuggestionKey, SuggestionBatch, Arc<dyn Clock>>>,
}

impl TripPlanner {
    pub fn new(
        routes: Arc<dyn RouteProvider>,
        suggester: Arc<dyn StopSuggester>,
        places: Arc<dyn PlaceSearch>,
        config: PlannerConfig,
    ) -> Self {
        Self::with_clock(routes, suggester, places, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        routes: Arc<dyn RouteProvider>,
        suggester: Arc<dyn StopSuggester>,
        places: Arc<dyn PlaceSearch>,
        config: PlannerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            routes,
            suggester,
            validator: StopValidator::new(places, config.validator),
            suggestion_cache: Mutex::new(TtlCache::with_clock(
                config.cache_capacity,
                config.cache_ttl,
                clock,
            )),
        }
    }

    /// Plan a trip end to end.
    ///
    /// Only a routing failure aborts planning. Suggestion or geocoding
    /// trouble degrades to fewer stops, down to just `start` and `end`.
    pub async fn plan_trip(
        &self,
        source: &Location,
        destination: &Location,
        trip_type: TripType,
        pricing: Pricing,
    ) -> Result<TripPlan, PlanError> {
        tracing::info!(
            "Planning {:?} trip {} -> {}",
            trip_type,
            source.name,
            destination.name
        );

        let routes = self
            .routes
            .fetch_routes(source.point(), destination.point())
            .await
            .map_err(PlanError::Routing)?;
        let route_options = build_route_options(routes);
        let Some(selected) = route_options.first() else {
            return Err(PlanError::NoRoute {
                from: source.name.clone(),
                to: destination.name.clone(),
            });
        };
        let route = selected.route.clone();
        let selected_route_id = selected.id.clone();
        if route.coordinates.is_empty() {
            return Err(RouteMapError::EmptyRoute.into());
        }

        let onward = self
            .leg_stops(Leg::Onward, source, destination, trip_type, &route)
            .await?;
        let ret = if trip_type.is_round_trip() {
            self.leg_stops(Leg::Return, destination, source, trip_type, &route)
                .await?
        } else {
            LegStops {
                validated: true,
                ..LegStops::default()
            }
        };

        let night_halt_hint = onward.night_halt.or(ret.night_halt);
        let stops_validated = onward.validated && ret.validated;
        let (start, end) = itinerary::endpoint_stops(source, destination, trip_type);
        let stops = itinerary::assemble_stops(start, onward.stops, ret.stops, end);

        let trip_stats = itinerary::trip_stats_for(
            &stops,
            &route,
            trip_type,
            pricing,
            night_halt_hint.as_deref(),
        );
        let days = itinerary::group_by_day(&stops, trip_stats.total_days);

        tracing::info!(
            "Planned {} -> {}: {:.0} km, {} stop(s), {} day(s), fare {:.0}",
            source.name,
            destination.name,
            trip_stats.total_distance_km,
            stops.len().saturating_sub(2),
            trip_stats.total_days,
            trip_stats.total_fare
        );

        Ok(TripPlan {
            source: source.clone(),
            destination: destination.clone(),
            trip_type,
            route,
            route_options,
            selected_route_id,
            stops,
            trip_stats,
            days,
            stops_validated,
            night_halt_hint,
        })
    }

    async fn leg_stops(
        &self,
        leg: Leg,
        leg_source: &Location,
        leg_dest: &Location,
        trip_type: TripType,
        route: &RouteData,
    ) -> Result<LegStops, PlanError> {
        let query = SuggestionQuery {
            source: leg_source.name.clone(),
            destination: leg_dest.name.clone(),
            distance_km: route.distance_km.max(0.0).round() as u32,
            leg,
            trip_type,
        };
        let batch = self.suggestions(&query).await;
        if batch.candidates.is_empty() {
            return Ok(LegStops {
                stops: Vec::new(),
                night_halt: batch.night_halt,
                validated: true,
            });
        }

        let validated = self
            .validator
            .validate_stops(&batch.candidates, leg, leg_source, leg_dest, &route.coordinates)
            .await;
        if !validated.is_empty() {
            tracing::debug!(
                "{} of {} {} suggestion(s) validated",
                validated.len(),
                batch.candidates.len(),
                leg.as_str()
            );
            return Ok(LegStops {
                stops: itinerary::stops_from_validated(&validated, route.coordinates.len()),
                night_halt: batch.night_halt,
                validated: true,
            });
        }

        tracing::warn!(
            "No {} suggestion survived validation, placing {} approximately",
            leg.as_str(),
            batch.candidates.len()
        );
        Ok(LegStops {
            stops: itinerary::place_unvalidated(&batch.candidates, leg, route)?,
            night_halt: batch.night_halt,
            validated: false,
        })
    }

    async fn suggestions(&self, query: &SuggestionQuery) -> SuggestionBatch {
        let key = SuggestionKey::from(query);
        let cached = self.cache().get(&key);
        if let Some(batch) = cached {
            tracing::debug!(
                "Suggestion cache hit for {} -> {} ({})",
                query.source,
                query.destination,
                query.leg.as_str()
            );
            return batch;
        }

        match self.suggester.suggest_stops(query).await {
            Ok(batch) => {
                if !batch.candidates.is_empty() {
                    self.cache().set(key, batch.clone());
                }
                batch
            }
            Err(err) => {
                tracing::warn!(
                    "Stop suggestions for {} -> {} unavailable: {}",
                    query.source,
                    query.destination,
                    err
                );
                SuggestionBatch::default()
            }
        }
    }

    fn cache(&self) -> MutexGuard<'_, TtlCache<SuggestionKey, SuggestionBatch, Arc<dyn Clock>>> {
        self.suggestion_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drop expired suggestion batches. Returns how many were removed.
    pub fn purge_expired_suggestions(&self) -> usize {
        self.cache().purge_expired()
    }

    /// Switch the active route and move every stop onto it.
    pub fn select_route(
        &self,
        plan: &mut TripPlan,
        route_id: &str,
        pricing: Pricing,
    ) -> Result<(), PlanError> {
        let option = plan
            .route_options
            .iter()
            .find(|option| option.id == route_id)
            .ok_or_else(|| PlanError::UnknownRoute(route_id.to_string()))?;
        if option.route.coordinates.is_empty() {
            return Err(RouteMapError::EmptyRoute.into());
        }

        plan.route = option.route.clone();
        plan.selected_route_id = option.id.clone();
        self.reproject_stops(plan);
        itinerary::refresh(plan, pricing);

        tracing::info!(
            "Switched to {} ({:.0} km)",
            plan.selected_route_id,
            plan.route.distance_km
        );
        Ok(())
    }

    fn reproject_stops(&self, plan: &mut TripPlan) {
        let step = self.validator.config().detour_sample_step;
        let route = &plan.route.coordinates;

        let mut start = None;
        let mut end = None;
        let mut onward = Vec::new();
        let mut ret = Vec::new();

        for mut stop in std::mem::take(&mut plan.stops) {
            match stop.stop_type {
                StopType::Start => start = Some(stop),
                StopType::End => end = Some(stop),
                _ => {
                    if let Some(sample) = nearest_route_sample(stop.location.point(), route, step) {
                        stop.progress = progress_of_index(route.len(), sample.route_index);
                        if stop.detour_km.is_some() {
                            stop.detour_km = Some(detour_for(sample.min_distance_km));
                        }
                    }
                    match stop.leg {
                        Leg::Onward => onward.push(stop),
                        Leg::Return => ret.push(stop),
                    }
                }
            }
        }

        onward.sort_by(|a, b| a.progress.total_cmp(&b.progress));
        ret.sort_by(|a, b| b.progress.total_cmp(&a.progress));

        plan.stops = start
            .into_iter()
            .chain(onward)
            .chain(ret)
            .chain(end)
            .collect();
    }
}

/// Label and color provider routes. The first route is the provider's
/// preferred one and stays recommended.
pub fn build_route_options(routes: Vec<RouteData>) -> Vec<RouteOption> {
    let shortest = routes
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.distance_km.total_cmp(&b.1.distance_km))
        .map(|(i, _)| i);

    routes
        .into_iter()
        .enumerate()
        .map(|(i, route)| {
            let label = if i == 0 {
                "Recommended".to_string()
            } else if Some(i) == shortest {
                "Shortest".to_string()
            } else {
                format!("Alternative {i}")
            };
            RouteOption {
                id: format!("route-{i}"),
                label,
                highlights: route_highlights(&route),
                color: ROUTE_COLORS[i % ROUTE_COLORS.len()].to_string(),
                is_recommended: i == 0,
                route,
            }
        })
        .collect()
}

fn route_highlights(route: &RouteData) -> Vec<String> {
    let minutes = route.duration_minutes.max(0.0).round() as u64;
    let mut highlights = vec![
        format!("{:.0} km", route.distance_km),
        format!("{}h {}m", minutes / 60, minutes % 60),
    ];
    match &route.toll_info {
        Some(toll) if toll.amount > 0.0 => {
            highlights.push(format!("Tolls ~{} {:.0}", toll.currency, toll.amount))
        }
        Some(_) => highlights.push("No tolls".to_string()),
        None => {}
    }
    highlights
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::cache::ManualClock;
    use crate::models::{RoutePoint, TollInfo};
    use crate::providers::{PlaceCandidate, ProviderError};
    use crate::suggestions::CandidateStop;

    fn bengaluru() -> Location {
        Location::new("Bengaluru", "Bengaluru, Karnataka", 12.97, 77.59)
    }

    fn mysuru() -> Location {
        Location::new("Mysuru", "Mysuru, Karnataka", 12.30, 76.64)
    }

    fn sedan() -> Pricing {
        Pricing {
            base_fare: 3900.0,
            per_km_rate: 12.0,
            driver_allowance_per_day: 300.0,
        }
    }

    fn along(t: f64) -> RoutePoint {
        bengaluru().point().interpolate(mysuru().point(), t)
    }

    fn straight_route(distance_km: f64) -> RouteData {
        RouteData {
            coordinates: (0..100).map(|i| along(i as f64 / 99.0)).collect(),
            distance_km,
            duration_minutes: 180.0,
            toll_info: Some(TollInfo {
                currency: "INR".into(),
                amount: 245.0,
            }),
        }
    }

    fn detour_route() -> RouteData {
        let south = RoutePoint::new(12.5, 77.3);
        let mut coordinates: Vec<RoutePoint> = (0..50)
            .map(|i| bengaluru().point().interpolate(south, i as f64 / 49.0))
            .collect();
        coordinates.extend((0..50).map(|i| south.interpolate(mysuru().point(), i as f64 / 49.0)));
        RouteData {
            coordinates,
            distance_km: 170.0,
            duration_minutes: 210.0,
            toll_info: None,
        }
    }

    enum Routing {
        Routes(Vec<RouteData>),
        Fail,
    }

    struct FixedRoutes(Routing);

    #[async_trait]
    impl RouteProvider for FixedRoutes {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_routes(
            &self,
            _origin: RoutePoint,
            _destination: RoutePoint,
        ) -> Result<Vec<RouteData>, ProviderError> {
            match &self.0 {
                Routing::Routes(routes) => Ok(routes.clone()),
                Routing::Fail => Err(ProviderError::Status {
                    provider: "fixed",
                    status: 503,
                    body: "down".into(),
                }),
            }
        }
    }

    struct ScriptedSuggester {
        onward: Option<SuggestionBatch>,
        ret: Option<SuggestionBatch>,
        calls: AtomicUsize,
    }

    impl ScriptedSuggester {
        fn new(onward: Option<SuggestionBatch>, ret: Option<SuggestionBatch>) -> Self {
            Self {
                onward,
                ret,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StopSuggester for ScriptedSuggester {
        async fn suggest_stops(
            &self,
            query: &SuggestionQuery,
        ) -> Result<SuggestionBatch, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let batch = match query.leg {
                Leg::Onward => &self.onward,
                Leg::Return => &self.ret,
            };
            batch
                .clone()
                .ok_or(ProviderError::NotConfigured("scripted"))
        }
    }

    struct TablePlaces(HashMap<&'static str, RoutePoint>);

    #[async_trait]
    impl PlaceSearch for TablePlaces {
        fn name(&self) -> &'static str {
            "table"
        }

        async fn search(
            &self,
            query: &str,
            _bias: RoutePoint,
        ) -> Result<Vec<PlaceCandidate>, ProviderError> {
            Ok(self
                .0
                .get(query)
                .map(|point| PlaceCandidate {
                    name: query.to_string(),
                    display_name: format!("{query}, Karnataka"),
                    point: *point,
                })
                .into_iter()
                .collect())
        }
    }

    fn places() -> Arc<TablePlaces> {
        Arc::new(TablePlaces(HashMap::from([
            ("Channapatna", along(0.4)),
            ("Maddur", along(0.6)),
            ("Srirangapatna", along(0.85)),
            ("Goa Beach", RoutePoint::new(15.3, 74.1)),
        ])))
    }

    fn candidate(name: &str, stop_type: StopType, approx_km: f64, minutes: u32) -> CandidateStop {
        CandidateStop {
            name: name.into(),
            stop_type,
            approx_km,
            duration_minutes: minutes,
            description: None,
            coordinates: None,
        }
    }

    fn onward_batch() -> SuggestionBatch {
        SuggestionBatch {
            candidates: vec![
                candidate("Srirangapatna", StopType::Heritage, 125.0, 60),
                candidate("Channapatna", StopType::Food, 60.0, 30),
            ],
            night_halt: None,
        }
    }

    fn return_batch() -> SuggestionBatch {
        SuggestionBatch {
            candidates: vec![candidate("Maddur", StopType::Restaurant, 60.0, 45)],
            night_halt: None,
        }
    }

    fn planner(routes: Routing, suggester: Arc<ScriptedSuggester>) -> TripPlanner {
        TripPlanner::new(
            Arc::new(FixedRoutes(routes)),
            suggester,
            places(),
            PlannerConfig::default(),
        )
    }

    fn ids(plan: &TripPlan) -> Vec<&str> {
        plan.stops.iter().map(|stop| stop.id.as_str()).collect()
    }

    #[tokio::test]
    async fn one_way_trip_orders_validated_stops() {
        let suggester = Arc::new(ScriptedSuggester::new(Some(onward_batch()), None));
        let planner = planner(Routing::Routes(vec![straight_route(145.0)]), suggester.clone());

        let plan = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();

        assert_eq!(ids(&plan), ["start", "onward-0", "onward-1", "end"]);
        assert_eq!(plan.stops[1].name, "Channapatna");
        assert_eq!(plan.stops[2].name, "Srirangapatna");
        assert!(plan.stops[1].progress < plan.stops[2].progress);
        assert!(plan.stops[1].detour_km.is_some_and(|km| km < 2.0));
        assert!(plan.stops_validated);
        assert_eq!(plan.selected_route_id, "route-0");
        assert_eq!(plan.trip_stats.total_days, 1);
        assert_eq!(plan.trip_stats.total_fare, 3900.0);
        assert_eq!(plan.trip_stats.toll_estimate, Some(245.0));
        assert_eq!(plan.days.len(), 1);
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn round_trip_adds_return_stops_and_ends_home() {
        let suggester = Arc::new(ScriptedSuggester::new(
            Some(onward_batch()),
            Some(return_batch()),
        ));
        let planner = planner(Routing::Routes(vec![straight_route(145.0)]), suggester.clone());

        let plan = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::RoundTrip, sedan())
            .await
            .unwrap();

        assert_eq!(ids(&plan), ["start", "onward-0", "onward-1", "return-0", "end"]);
        assert_eq!(plan.stops[3].leg, Leg::Return);
        let end = plan.stops.last().unwrap();
        assert_eq!(end.location, bengaluru());
        assert_eq!(plan.trip_stats.total_distance_km, 290.0);
        assert_eq!(plan.trip_stats.toll_estimate, Some(490.0));
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn suggestion_failure_keeps_endpoints() {
        let suggester = Arc::new(ScriptedSuggester::new(None, None));
        let planner = planner(Routing::Routes(vec![straight_route(145.0)]), suggester);

        let plan = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();

        assert_eq!(ids(&plan), ["start", "end"]);
        assert_eq!(plan.days[0].stops.len(), 2);
    }

    #[tokio::test]
    async fn rejected_suggestions_are_placed_approximately() {
        let batch = SuggestionBatch {
            candidates: vec![candidate("Goa Beach", StopType::Viewpoint, 72.5, 30)],
            night_halt: Some("Goa".into()),
        };
        let suggester = Arc::new(ScriptedSuggester::new(Some(batch), None));
        let planner = planner(Routing::Routes(vec![straight_route(145.0)]), suggester);

        let plan = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();

        assert!(!plan.stops_validated);
        assert_eq!(plan.stops.len(), 3);
        assert_eq!(plan.stops[1].location.point(), plan.route.coordinates[50]);
        assert_eq!(plan.stops[1].detour_km, None);
        assert_eq!(plan.night_halt_hint.as_deref(), Some("Goa"));
    }

    #[tokio::test]
    async fn routing_failure_aborts() {
        let suggester = Arc::new(ScriptedSuggester::new(Some(onward_batch()), None));
        let planner = planner(Routing::Fail, suggester.clone());

        let err = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap_err();

        assert!(matches!(err, PlanError::Routing(_)));
        assert!(err.to_string().starts_with("could not plan trip"));
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_route_is_an_error() {
        let suggester = Arc::new(ScriptedSuggester::new(None, None));
        let planner = planner(Routing::Routes(Vec::new()), suggester);

        let err = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::NoRoute { .. }));
    }

    #[tokio::test]
    async fn suggestions_are_cached_until_expiry() {
        let clock = Arc::new(ManualClock::new(
            chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        ));
        let suggester = Arc::new(ScriptedSuggester::new(Some(onward_batch()), None));
        let planner = TripPlanner::with_clock(
            Arc::new(FixedRoutes(Routing::Routes(vec![straight_route(145.0)]))),
            suggester.clone(),
            places(),
            PlannerConfig::default(),
            clock.clone(),
        );

        let shouty = Location::new("  BENGALURU ", "Bengaluru", 12.97, 77.59);
        planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();
        planner
            .plan_trip(&shouty, &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::days(DEFAULT_TTL_DAYS) + Duration::seconds(1));
        assert_eq!(planner.purge_expired_suggestions(), 1);
        planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn selecting_a_route_reprojects_stops() {
        let suggester = Arc::new(ScriptedSuggester::new(Some(onward_batch()), None));
        let planner = planner(
            Routing::Routes(vec![straight_route(145.0), detour_route()]),
            suggester,
        );
        let mut plan = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();
        let before = plan.stops[1].clone();

        planner.select_route(&mut plan, "route-1", sedan()).unwrap();

        assert_eq!(plan.selected_route_id, "route-1");
        assert_eq!(plan.route.distance_km, 170.0);
        assert_eq!(plan.trip_stats.total_distance_km, 170.0);
        assert_eq!(ids(&plan), ["start", "onward-0", "onward-1", "end"]);
        assert_eq!(plan.stops[1].name, before.name);
        assert!(plan.stops[1].detour_km > before.detour_km);
    }

    #[tokio::test]
    async fn unknown_route_id() {
        let suggester = Arc::new(ScriptedSuggester::new(None, None));
        let planner = planner(Routing::Routes(vec![straight_route(145.0)]), suggester);
        let mut plan = planner
            .plan_trip(&bengaluru(), &mysuru(), TripType::OneWay, sedan())
            .await
            .unwrap();

        let err = planner.select_route(&mut plan, "route-7", sedan()).unwrap_err();
        assert!(matches!(err, PlanError::UnknownRoute(id) if id == "route-7"));
        assert_eq!(plan.selected_route_id, "route-0");
    }

    #[test]
    fn route_options_are_labelled() {
        let mut short = straight_route(120.0);
        short.toll_info = Some(TollInfo {
            currency: "INR".into(),
            amount: 0.0,
        });
        let options = build_route_options(vec![straight_route(145.0), detour_route(), short]);

        assert_eq!(options.len(), 3);
        assert!(options[0].is_recommended);
        assert!(!options[1].is_recommended);
        assert_eq!(options[0].label, "Recommended");
        assert_eq!(options[1].label, "Alternative 1");
        assert_eq!(options[2].label, "Shortest");
        assert_eq!(options[0].highlights, ["145 km", "3h 0m", "Tolls ~INR 245"]);
        assert_eq!(options[1].highlights, ["170 km", "3h 30m"]);
        assert_eq!(options[2].highlights[2], "No tolls");
        assert_ne!(options[0].color, options[1].color);
    }
}

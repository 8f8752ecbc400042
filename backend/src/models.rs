pub use shared::{
    ApiError, Booking, BookingRequest, BookingStatus, Car, DayPlan, FareRequest, GpxResponse, Leg,
    Location, PlanTripRequest, Pricing, ReplanRequest, RouteData, RouteOption, RoutePoint,
    SelectCarRequest, SelectRouteRequest, Stop, StopType, TollInfo, TripPlan,
    TripSessionResponse, TripStats, TripType,
};

use std::sync::Arc;

use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use carona::api::{AccountAPI, DestinationAPI, RideAPI, RideRequestAPI, VehicleAPI};
use carona::auth::User;
use carona::engine::Engine;
use carona::entities::ride::Status as RideStatus;
use carona::entities::ride_request::Status;
use carona::entities::vehicle::Kind;
use carona::entities::{
    ClockTime, DestinationDetails, Registration, RideDetails, RideRequest, Role, VehicleDetails,
};
use carona::error::{INVALID_INPUT, INVALID_STATE, NOT_FOUND, UNAUTHENTICATED, UNAUTHORIZED};
use carona::matching::MatchCriteria;
use carona::store::{Collection, DynStore, MemoryStore, Store};

fn account(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": format!("User {}", id),
        "email": format!("{}@carona.test", id),
        "password": "secret123",
        "role": role,
    })
}

fn destination(id: &str, user_id: &str, lat: f64, lng: f64, start_time: &str) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "name": id,
        "startAddress": "Rua A",
        "startLat": lat,
        "startLng": lng,
        "startTime": start_time,
        "endAddress": "Rua B",
        "endLat": lat + 0.05,
        "endLng": lng + 0.05,
    })
}

fn ride(id: &str, driver_id: &str, vehicle_id: &str, lat: f64, lng: f64, start_time: &str) -> Value {
    json!({
        "id": id,
        "driverId": driver_id,
        "vehicleId": vehicle_id,
        "startAddress": "Praça Sete",
        "startLat": lat,
        "startLng": lng,
        "endAddress": "Pampulha",
        "endLat": -19.85,
        "endLng": -43.97,
        "startTime": start_time,
        "availableSeats": 3,
        "status": "AVAILABLE",
    })
}

async fn setup() -> (Arc<Engine>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());

    store
        .seed(
            Collection::Users,
            vec![
                account("d1", "driver"),
                account("d2", "driver"),
                account("p1", "passenger"),
                account("p2", "passenger"),
            ],
        )
        .await;

    store
        .seed(
            Collection::Vehicles,
            vec![json!({
                "id": "v1",
                "driverId": "d1",
                "brand": "Fiat",
                "model": "Uno",
                "color": "white",
                "licensePlate": "ABC1D23",
                "type": "CAR",
                "availableSeats": 4,
            })],
        )
        .await;

    store
        .seed(
            Collection::Rides,
            vec![
                ride("r1", "d1", "v1", -19.9200, -43.9400, "08:00"),
                ride("r2", "d2", "v2", -23.5500, -46.6300, "08:00"),
            ],
        )
        .await;

    store
        .seed(
            Collection::Destinations,
            vec![destination("dest1", "p1", -19.9210, -43.9390, "08:10")],
        )
        .await;

    let engine = Engine::new(store.clone() as DynStore, MatchCriteria::default()).unwrap();

    (Arc::new(engine), store)
}

async fn user(engine: &Engine, id: &str) -> User {
    engine.find_user(id).await.unwrap()
}

#[tokio::test]
async fn request_goes_through_the_whole_lifecycle() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let request = assert_ok!(engine.request_ride(passenger.clone(), "r1", None).await);
    assert_eq!(request.status, Status::Pending);
    assert_eq!(request.driver_id, "d1");
    assert_eq!(request.destination_id, "dest1");

    let accepted = assert_ok!(engine.accept_request(driver.clone(), &request.id).await);
    assert_eq!(accepted.status, Status::Accepted);

    let started = assert_ok!(engine.start_request(driver.clone(), &request.id).await);
    assert_eq!(started.status, Status::InProgress);
    assert!(started.ride_start_time.is_some());
    assert!(started.completed_at.is_none());

    let completed = assert_ok!(engine.complete_request(driver, &request.id).await);
    assert_eq!(completed.status, Status::Completed);
    assert!(completed.completed_at.is_some());

    let stored = engine.find_request(passenger, &request.id).await.unwrap();
    assert_eq!(stored, completed);
    assert_eq!(stored.ride_start_time, started.ride_start_time);
}

#[tokio::test]
async fn in_progress_request_can_be_cancelled() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let request = engine.request_ride(passenger, "r1", None).await.unwrap();
    engine.accept_request(driver.clone(), &request.id).await.unwrap();
    engine.start_request(driver.clone(), &request.id).await.unwrap();

    let cancelled = assert_ok!(engine.cancel_request(driver.clone(), &request.id).await);
    assert_eq!(cancelled.status, Status::Cancelled);
    assert!(cancelled.completed_at.is_some());

    let err = assert_err!(engine.complete_request(driver, &request.id).await);
    assert!(err.is_invalid_transition());
}

#[tokio::test]
async fn rejected_transitions_leave_the_record_untouched() {
    let (engine, store) = setup().await;
    let driver = user(&engine, "d1").await;
    let other_driver = user(&engine, "d2").await;
    let passenger = user(&engine, "p1").await;

    let request = engine.request_ride(passenger.clone(), "r1", None).await.unwrap();

    let skip = assert_err!(engine.complete_request(driver.clone(), &request.id).await);
    assert!(skip.is_invalid_transition());

    let by_passenger = assert_err!(engine.accept_request(passenger.clone(), &request.id).await);
    assert!(by_passenger.is_invalid_transition());

    let by_other_driver = assert_err!(engine.accept_request(other_driver, &request.id).await);
    assert!(by_other_driver.is_invalid_transition());

    let stored = store
        .find(Collection::RideRequests, &request.id)
        .await
        .unwrap()
        .unwrap();
    let stored: RideRequest = serde_json::from_value(stored).unwrap();
    assert_eq!(stored, request);

    engine.reject_request(driver.clone(), &request.id).await.unwrap();
    let terminal = assert_err!(engine.accept_request(driver, &request.id).await);
    assert!(terminal.is_invalid_transition());
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;

    let err = assert_err!(engine.accept_request(driver, "missing").await);
    assert_eq!(err.code, NOT_FOUND);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn concurrent_transitions_on_one_request_are_serialized() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let request = engine.request_ride(passenger, "r1", None).await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            let driver = driver.clone();
            let id = request.id.clone();
            tokio::spawn(async move { engine.accept_request(driver, &id).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(request) => {
                assert_eq!(request.status, Status::Accepted);
                accepted += 1;
            }
            Err(err) => assert!(err.is_invalid_transition()),
        }
    }

    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn duplicate_pending_request_is_refused() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let first = engine.request_ride(passenger.clone(), "r1", None).await.unwrap();

    let err = assert_err!(engine.request_ride(passenger.clone(), "r1", None).await);
    assert_eq!(err.code, INVALID_INPUT);

    engine.reject_request(driver, &first.id).await.unwrap();
    assert_ok!(engine.request_ride(passenger, "r1", None).await);
}

#[tokio::test]
async fn request_destination_must_be_unambiguous_and_owned() {
    let (engine, store) = setup().await;
    let p1 = user(&engine, "p1").await;
    let p2 = user(&engine, "p2").await;

    let no_destination = assert_err!(engine.request_ride(p2.clone(), "r1", None).await);
    assert_eq!(no_destination.code, INVALID_INPUT);

    let missing_ride = assert_err!(engine.request_ride(p1.clone(), "nope", None).await);
    assert_eq!(missing_ride.code, NOT_FOUND);

    store
        .seed(
            Collection::Destinations,
            vec![
                destination("dest2", "p1", -19.93, -43.95, "18:00"),
                destination("dest3", "p2", -19.93, -43.95, "18:00"),
            ],
        )
        .await;

    let ambiguous = assert_err!(engine.request_ride(p1.clone(), "r1", None).await);
    assert_eq!(ambiguous.code, INVALID_INPUT);

    let not_owned = assert_err!(engine.request_ride(p1.clone(), "r1", Some("dest3".into())).await);
    assert_eq!(not_owned.code, NOT_FOUND);

    let request = assert_ok!(engine.request_ride(p1, "r1", Some("dest2".into())).await);
    assert_eq!(request.destination_id, "dest2");
}

#[tokio::test]
async fn role_gates_are_enforced() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let err = assert_err!(engine.request_ride(driver, "r1", None).await);
    assert_eq!(err.code, UNAUTHORIZED);

    let err = assert_err!(engine.driver_inbox(passenger.clone()).await);
    assert_eq!(err.code, UNAUTHORIZED);

    let err = assert_err!(engine.delete_ride(passenger, "r1").await);
    assert_eq!(err.code, UNAUTHORIZED);
}

#[tokio::test]
async fn passenger_board_lists_matching_rides_with_request_status() {
    let (engine, _) = setup().await;
    let passenger = user(&engine, "p1").await;

    let board = engine.list_rides(passenger.clone()).await.unwrap();
    assert!(board.mine.is_empty());
    assert_eq!(board.others.len(), 1);

    let listing = &board.others[0];
    assert_eq!(listing.ride.id, "r1");
    assert_eq!(listing.driver.as_ref().map(|d| d.id.as_str()), Some("d1"));
    assert_eq!(listing.vehicle.as_ref().map(|v| v.id.as_str()), Some("v1"));
    assert_eq!(listing.request_status, None);

    engine.request_ride(passenger.clone(), "r1", None).await.unwrap();

    let board = engine.list_rides(passenger).await.unwrap();
    assert_eq!(board.others[0].request_status, Some(Status::Pending));
}

#[tokio::test]
async fn driver_board_separates_own_rides() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;

    let board = engine.list_rides(driver).await.unwrap();

    let mine: Vec<_> = board.mine.iter().map(|l| l.ride.id.as_str()).collect();
    let others: Vec<_> = board.others.iter().map(|l| l.ride.id.as_str()).collect();
    assert_eq!(mine, vec!["r1"]);
    assert_eq!(others, vec!["r2"]);

    // v2 does not exist
    assert!(board.others[0].vehicle.is_none());
    assert!(board.others[0].driver.is_some());
}

#[tokio::test]
async fn inbox_skips_requests_whose_destination_is_gone() {
    let (engine, store) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let kept = engine.request_ride(passenger.clone(), "r1", None).await.unwrap();

    let orphan = RideRequest::new(
        "orphan".into(),
        "r1".into(),
        "p2".into(),
        "d1".into(),
        "gone".into(),
        chrono::Utc::now(),
    );
    store
        .seed(Collection::RideRequests, vec![serde_json::to_value(&orphan).unwrap()])
        .await;

    let inbox = engine.driver_inbox(driver).await.unwrap();

    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].request.id, kept.id);
    assert_eq!(inbox[0].passenger.as_ref().map(|p| p.id.as_str()), Some("p1"));
    assert_eq!(
        inbox[0].destination.as_ref().map(|d| d.id.as_str()),
        Some("dest1")
    );
}

#[tokio::test]
async fn stats_and_itinerary_follow_request_statuses() {
    let (engine, store) = setup().await;
    let driver = user(&engine, "d1").await;
    let p1 = user(&engine, "p1").await;
    let p2 = user(&engine, "p2").await;

    store
        .seed(
            Collection::Destinations,
            vec![destination("dest-p2", "p2", -19.9300, -43.9500, "07:30")],
        )
        .await;

    let first = engine.request_ride(p1, "r1", None).await.unwrap();
    let second = engine.request_ride(p2, "r1", None).await.unwrap();

    assert_eq!(engine.driver_itinerary(driver.clone()).await.unwrap(), None);

    engine.accept_request(driver.clone(), &first.id).await.unwrap();
    engine.accept_request(driver.clone(), &second.id).await.unwrap();

    let stats = engine.driver_stats(driver.clone()).await.unwrap();
    assert_eq!((stats.total, stats.pending, stats.accepted, stats.rejected), (2, 0, 2, 0));

    let itinerary = engine.driver_itinerary(driver).await.unwrap().unwrap();
    let order: Vec<_> = itinerary.stops.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(order, vec!["dest-p2", "dest1"]);
    assert_eq!(itinerary.origin, itinerary.stops[0].start());
    assert_eq!(itinerary.destination, itinerary.stops[1].end());
    assert!(itinerary.waypoints.is_empty());
}

#[tokio::test]
async fn history_is_newest_first() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let first = engine.request_ride(passenger.clone(), "r1", None).await.unwrap();
    engine.reject_request(driver.clone(), &first.id).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = engine.request_ride(passenger.clone(), "r1", None).await.unwrap();

    let history = engine.travel_history(passenger).await.unwrap();
    let ids: Vec<_> = history.iter().map(|h| h.request.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    assert!(history[0].ride.is_some());
    assert!(history[0].vehicle.is_some());
    assert!(history[0].passenger.is_none());

    let history = engine.travel_history(driver).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|h| h.passenger.is_some()));
}

#[tokio::test]
async fn destinations_are_private_to_their_owner() {
    let (engine, _) = setup().await;
    let p1 = user(&engine, "p1").await;
    let p2 = user(&engine, "p2").await;

    assert_ok!(engine.find_destination(p1.clone(), "dest1").await);

    let err = assert_err!(engine.find_destination(p2.clone(), "dest1").await);
    assert_eq!(err.code, UNAUTHORIZED);

    assert!(engine.list_destinations(p2).await.unwrap().is_empty());
    assert_eq!(engine.list_destinations(p1).await.unwrap().len(), 1);
}

fn ride_details(vehicle_id: &str, seats: u32) -> RideDetails {
    RideDetails {
        vehicle_id: vehicle_id.into(),
        route_id: None,
        start_address: "Savassi".into(),
        start_lat: -19.9380,
        start_lng: -43.9350,
        end_address: "Pampulha".into(),
        end_lat: -19.8500,
        end_lng: -43.9700,
        start_time: ClockTime::from_hm(7, 30).unwrap(),
        available_seats: seats,
    }
}

fn vehicle_details(kind: Kind, seats: u32) -> VehicleDetails {
    VehicleDetails {
        brand: "VW".into(),
        model: "Gol".into(),
        color: "silver".into(),
        license_plate: "XYZ9A87".into(),
        kind,
        available_seats: seats,
    }
}

#[tokio::test]
async fn ride_seats_are_bounded_by_the_chosen_vehicle() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d2").await;

    let small_car = engine
        .create_vehicle(driver.clone(), vehicle_details(Kind::Car, 2))
        .await
        .unwrap();

    let err = assert_err!(engine.create_ride(driver.clone(), ride_details(&small_car.id, 4)).await);
    assert_eq!(err.code, INVALID_INPUT);

    let ride = assert_ok!(engine.create_ride(driver.clone(), ride_details(&small_car.id, 2)).await);
    assert_eq!(ride.status, RideStatus::Available);
    assert_eq!(ride.driver_id, "d2");

    let err = assert_err!(engine.update_ride(driver.clone(), &ride.id, ride_details(&small_car.id, 3)).await);
    assert_eq!(err.code, INVALID_INPUT);

    let updated = assert_ok!(engine.update_ride(driver, &ride.id, ride_details(&small_car.id, 1)).await);
    assert_eq!(updated.id, ride.id);
    assert_eq!(updated.available_seats, 1);
}

#[tokio::test]
async fn rides_need_a_vehicle_of_the_driver() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d2").await;

    let err = assert_err!(engine.create_ride(driver.clone(), ride_details("v1", 1)).await);
    assert_eq!(err.code, INVALID_INPUT);

    let err = assert_err!(engine.create_ride(driver, ride_details("nope", 1)).await);
    assert_eq!(err.code, NOT_FOUND);
}

#[tokio::test]
async fn finished_rides_keep_their_status() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let other = user(&engine, "d2").await;

    let err = assert_err!(engine.update_ride_status(other, "r1", RideStatus::Cancelled).await);
    assert_eq!(err.code, UNAUTHORIZED);

    let started = assert_ok!(engine.update_ride_status(driver.clone(), "r1", RideStatus::InProgress).await);
    assert_eq!(started.status, RideStatus::InProgress);

    let done = assert_ok!(engine.update_ride_status(driver.clone(), "r1", RideStatus::Completed).await);
    assert_eq!(done.status, RideStatus::Completed);

    let err = assert_err!(engine.update_ride_status(driver.clone(), "r1", RideStatus::Available).await);
    assert_eq!(err.code, INVALID_STATE);

    let err = assert_err!(engine.update_ride_status(driver.clone(), "r1", RideStatus::Cancelled).await);
    assert_eq!(err.code, INVALID_STATE);

    assert_eq!(engine.find_ride("r1").await.unwrap().status, RideStatus::Completed);

    let rides = engine.list_driver_rides(driver).await.unwrap();
    let ids: Vec<_> = rides.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1"]);
}

#[tokio::test]
async fn driver_board_keeps_own_finished_rides() {
    let (engine, store) = setup().await;
    let driver = user(&engine, "d1").await;

    let mut finished = ride("r3", "d2", "v2", -19.92, -43.94, "09:00");
    finished["status"] = json!("COMPLETED");
    store.seed(Collection::Rides, vec![finished]).await;

    engine
        .update_ride_status(driver.clone(), "r1", RideStatus::InProgress)
        .await
        .unwrap();

    let board = engine.list_rides(driver).await.unwrap();

    let mine: Vec<_> = board.mine.iter().map(|l| l.ride.id.as_str()).collect();
    let others: Vec<_> = board.others.iter().map(|l| l.ride.id.as_str()).collect();
    assert_eq!(mine, vec!["r1"]);
    assert_eq!(others, vec!["r2"]);
}

#[tokio::test]
async fn register_and_login() {
    let (engine, _) = setup().await;

    let registration = Registration {
        name: "Maria".into(),
        email: "maria@carona.test".into(),
        password: "hunter22".into(),
        role: Role::Passenger,
    };

    let profile = assert_ok!(engine.register(registration.clone()).await);
    assert_eq!(profile.role, Role::Passenger);

    let duplicate = assert_err!(engine.register(registration).await);
    assert_eq!(duplicate.code, INVALID_INPUT);

    let logged_in = assert_ok!(engine.login("maria@carona.test", "hunter22").await);
    assert_eq!(logged_in, profile);

    let wrong = assert_err!(engine.login("maria@carona.test", "hunter23").await);
    assert_eq!(wrong.code, UNAUTHENTICATED);

    let unknown = assert_err!(engine.login("joao@carona.test", "hunter22").await);
    assert_eq!(unknown.code, UNAUTHENTICATED);

    let short = Registration {
        name: "Jo".into(),
        email: "jo@carona.test".into(),
        password: "hunter22".into(),
        role: Role::Driver,
    };
    assert_eq!(assert_err!(engine.register(short).await).code, INVALID_INPUT);
}

#[tokio::test]
async fn driver_vehicle_is_upserted() {
    let (engine, _) = setup().await;
    let d1 = user(&engine, "d1").await;
    let d2 = user(&engine, "d2").await;

    let updated = assert_ok!(engine.upsert_driver_vehicle(d1.clone(), vehicle_details(Kind::Car, 3)).await);
    assert_eq!(updated.id, "v1");
    assert_eq!(updated.model, "Gol");
    assert_eq!(engine.list_driver_vehicles(d1.clone()).await.unwrap().len(), 1);

    let created = assert_ok!(engine.upsert_driver_vehicle(d2.clone(), vehicle_details(Kind::Motorcycle, 1)).await);
    assert_eq!(created.driver_id, "d2");
    assert_eq!(engine.list_driver_vehicles(d2.clone()).await.unwrap(), vec![created]);

    let err = assert_err!(engine.upsert_driver_vehicle(d2.clone(), vehicle_details(Kind::Motorcycle, 2)).await);
    assert_eq!(err.code, INVALID_INPUT);

    assert_ok!(engine.delete_driver_vehicle(d2.clone()).await);
    assert!(engine.list_driver_vehicles(d2.clone()).await.unwrap().is_empty());
    assert_ok!(engine.delete_driver_vehicle(d2).await);

    assert_ok!(engine.find_vehicle("v1").await);
}

#[tokio::test]
async fn destinations_are_created_and_updated_by_their_owner() {
    let (engine, _) = setup().await;
    let p1 = user(&engine, "p1").await;
    let p2 = user(&engine, "p2").await;
    let driver = user(&engine, "d1").await;

    let details = DestinationDetails {
        default: true,
        name: "Trabalho".into(),
        start_address: "Casa".into(),
        start_lat: -19.93,
        start_lng: -43.95,
        start_time: ClockTime::from_hm(7, 45).unwrap(),
        end_address: "Escritório".into(),
        end_lat: -19.90,
        end_lng: -43.93,
    };

    let err = assert_err!(engine.create_destination(driver, details.clone()).await);
    assert_eq!(err.code, UNAUTHORIZED);

    let created = assert_ok!(engine.create_destination(p2.clone(), details.clone()).await);
    assert_eq!(created.user_id, "p2");
    assert!(created.default);

    let renamed = DestinationDetails {
        name: "Faculdade".into(),
        ..details
    };

    let err = assert_err!(engine.update_destination(p1, &created.id, renamed.clone()).await);
    assert_eq!(err.code, UNAUTHORIZED);

    let updated = assert_ok!(engine.update_destination(p2.clone(), &created.id, renamed).await);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Faculdade");
    assert_eq!(engine.find_destination(p2, &created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn history_summary_counts_trips_and_distance() {
    let (engine, _) = setup().await;
    let driver = user(&engine, "d1").await;
    let passenger = user(&engine, "p1").await;

    let first = engine.request_ride(passenger.clone(), "r1", None).await.unwrap();
    engine.accept_request(driver.clone(), &first.id).await.unwrap();
    engine.start_request(driver.clone(), &first.id).await.unwrap();
    engine.complete_request(driver.clone(), &first.id).await.unwrap();
    engine.request_ride(passenger.clone(), "r1", None).await.unwrap();

    let ride = engine.find_ride("r1").await.unwrap();
    let summary = engine.history_summary(passenger).await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed, 1);
    assert!((summary.distance_km - 2.0 * ride.start().distance_km(&ride.end())).abs() < 1e-9);
    assert_eq!(summary.expected_duration, ride.expected_duration() * 2);

    let empty = engine.history_summary(user(&engine, "p2").await).await.unwrap();
    assert_eq!(empty.total, 0);
}

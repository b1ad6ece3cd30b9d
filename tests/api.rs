use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use chrono::NaiveDate;
use serde_json::{json, Value};

use courtside::api::{ApiClient, ApiError};
use courtside::models::{RecordId, Role, Session, UserProfile};
use courtside::reservation::{Banner, FormStatus, ReservationForm, ReservationSlot, BOOKING_CONFIRMED};
use courtside::schedule::{
    Day, GroupCode, LocalScheduleStore, RemoteScheduleStore, ScheduleEntry, ScheduleError,
    ScheduleRepository, TimeSlot,
};
use courtside::session::{AdminSessionStore, SessionContext, AUTH_TOKEN_KEY};
use courtside::storage::{MemoryStorage, Storage};
use courtside::types::SharedStorage;
use courtside::views::Redirect;

/// Starts a fake backend on an ephemeral port and returns its base url.
fn serve<F>(routes: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server = HttpServer::new(move || App::new().configure(routes.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake backend");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

fn client(base: &str) -> (ApiClient, SharedStorage) {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let client = ApiClient::new(
        base,
        SessionContext::new(storage.clone()),
        AdminSessionStore::new(storage.clone()),
    );
    (client, storage)
}

fn signed_in(base: &str) -> ApiClient {
    let (client, _) = client(base);
    client
        .session()
        .set_session(&Session {
            token: "tok".into(),
            user: UserProfile {
                first_name: "Lina".into(),
                last_name: "Cherif".into(),
                phone_number: None,
                role: Role::Player,
            },
        })
        .unwrap();
    client
}

fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn booking_form(court: &str) -> ReservationForm {
    let mut form = ReservationForm::new();
    form.court_id = court.into();
    form.date = NaiveDate::from_ymd_opt(2025, 3, 1);
    form.slot = ReservationSlot::parse("09:30");
    form
}

async fn create_reservation(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    if bearer(&req).as_deref() != Some("Bearer tok") {
        return HttpResponse::Unauthorized().json(json!({"error": "Missing token"}));
    }
    let body = body.into_inner();
    match body["court_id"].as_str() {
        Some("3") => HttpResponse::Conflict().json(json!({"error": "Court unavailable"})),
        Some("2") => HttpResponse::InternalServerError().body("upstream exploded"),
        _ => HttpResponse::Created().json(json!({
            "message": "Reservation created",
            "id": "r1",
            "reservation_time": body["reservation_time"],
        })),
    }
}

fn reservation_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reservations", web::post().to(create_reservation));
}

#[actix_web::test]
async fn reservation_is_confirmed_on_created() {
    let base = serve(reservation_routes);
    let client = signed_in(&base);

    let mut form = booking_form("1");
    match form.submit(&client).await {
        FormStatus::Confirmed(receipt) => {
            assert_eq!(receipt.reservation_id, Some(RecordId::Text("r1".into())));
            assert_eq!(receipt.extra.get("reservation_time"), Some(&json!("2025-03-01T09:30:00")));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(form.banner(), Some(Banner::Success(BOOKING_CONFIRMED.into())));
}

#[actix_web::test]
async fn backend_error_message_is_shown_verbatim() {
    let base = serve(reservation_routes);
    let client = signed_in(&base);

    let mut form = booking_form("3");
    form.submit(&client).await;
    assert_eq!(form.banner(), Some(Banner::Error("Court unavailable".into())));
}

#[actix_web::test]
async fn failure_without_error_body_uses_fallback() {
    let base = serve(reservation_routes);
    let client = signed_in(&base);

    let mut form = booking_form("2");
    form.submit(&client).await;
    assert_eq!(form.banner(), Some(Banner::Error("Reservation failed!".into())));
}

static DELETE_HITS: AtomicUsize = AtomicUsize::new(0);

async fn delete_reservation() -> HttpResponse {
    DELETE_HITS.fetch_add(1, Ordering::SeqCst);
    HttpResponse::NoContent().finish()
}

#[actix_web::test]
async fn missing_token_never_reaches_the_backend() {
    let base = serve(|cfg: &mut web::ServiceConfig| {
        cfg.route("/reservations/{id}", web::delete().to(delete_reservation));
    });

    let (anonymous, _) = client(&base);
    let err = anonymous.delete_reservation("r1").await.unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
    assert_eq!(err.to_string(), "Unauthorized: No token found");
    assert_eq!(DELETE_HITS.load(Ordering::SeqCst), 0);

    let member = signed_in(&base);
    let ack = member.delete_reservation("r1").await.unwrap();
    assert_eq!(ack.message, None);
    assert_eq!(DELETE_HITS.load(Ordering::SeqCst), 1);
}

async fn login(body: web::Json<Value>) -> HttpResponse {
    let body = body.into_inner();
    match (body["user_id"].as_str(), body["password"].as_str()) {
        (Some("amel"), Some("secret")) => HttpResponse::Ok().json(json!({
            "message": "Login successful",
            "token": "abc123",
            "role": "coach",
        })),
        (Some("nadia"), Some("secret")) => HttpResponse::Ok().json(json!({
            "message": "Login successful",
            "token": "nadia-token",
            "role": "player",
        })),
        _ => HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"})),
    }
}

// Same shape as the backend's `User.to_dict`.
async fn current_user(req: HttpRequest) -> HttpResponse {
    match bearer(&req).as_deref() {
        Some("Bearer abc123") => HttpResponse::Ok().json(json!({
            "id": 3,
            "firstName": "Amel",
            "lastName": "Haddad",
            "role": "coach",
        })),
        Some("Bearer nadia-token") => HttpResponse::Ok().json(json!({
            "id": 7,
            "firstName": "Nadia",
            "lastName": "Belkacem",
            "role": "player",
        })),
        _ => HttpResponse::Unauthorized().json(json!({"error": "Unauthorized"})),
    }
}

fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/user", web::get().to(current_user));
}

#[actix_web::test]
async fn login_stores_the_session_and_notifies() {
    let base = serve(auth_routes);
    let (client, storage) = client(&base);
    let mut changes = client.session().subscribe();

    let session = client.login("amel", "secret").await.unwrap();
    assert_eq!(session.user.full_name(), "Amel Haddad");
    assert_eq!(session.user.role, Role::Coach);
    assert_eq!(storage.get(AUTH_TOKEN_KEY).as_deref(), Some("abc123"));
    assert_eq!(client.session().get_session(), Some(session.clone()));

    assert!(changes.has_changed().unwrap());
    assert_eq!(changes.borrow_and_update().clone(), Some(session));

    client.logout().unwrap();
    assert!(changes.has_changed().unwrap());
    assert_eq!(changes.borrow_and_update().clone(), None);
    assert_eq!(client.session().get_session(), None);
}

#[actix_web::test]
async fn login_without_profile_reads_the_user_record() {
    let base = serve(auth_routes);
    let (client, _) = client(&base);

    let session = client.login("nadia", "secret").await.unwrap();
    assert_eq!(session.token, "nadia-token");
    assert_eq!(session.user.full_name(), "Nadia Belkacem");
    assert_eq!(session.user.role, Role::Player);
    assert_eq!(session.user.phone_number, None);
}

#[actix_web::test]
async fn rejected_login_leaves_no_session() {
    let base = serve(auth_routes);
    let (client, _) = client(&base);

    let err = client.login("amel", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(client.session().get_session(), None);
}

#[actix_web::test]
async fn expired_token_turns_into_a_login_redirect() {
    let base = serve(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/reservations/client",
            web::get().to(|| async { HttpResponse::Unauthorized().json(json!({"error": "Token expired"})) }),
        );
    });
    let client = signed_in(&base);

    let err = client.my_reservations().await.unwrap_err();
    assert_eq!(err.to_string(), "Token expired");
    assert_eq!(
        Redirect::from_api_error(&err, "/reservation").map(|r| r.location()),
        Some("/login?returnUrl=/reservation".to_string())
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let (client, _) = client(&format!("http://127.0.0.1:{port}"));

    let err = client.coaches().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.to_string(), "Network error, please try again!");
}

type ScheduleState = web::Data<Mutex<Vec<Value>>>;

fn is_admin(req: &HttpRequest) -> bool {
    bearer(req).as_deref() == Some("Bearer adm-1")
}

async fn admin_login(body: web::Json<Value>) -> HttpResponse {
    if body.into_inner()["username"] == "admin" {
        HttpResponse::Ok().json(json!({"token": "adm-1", "role": "admin"}))
    } else {
        HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"}))
    }
}

async fn get_schedule(req: HttpRequest, state: ScheduleState) -> HttpResponse {
    if !is_admin(&req) {
        return HttpResponse::Forbidden().json(json!({"error": "Admin access required"}));
    }
    let entries = state.lock().unwrap().clone();
    HttpResponse::Ok().json(entries)
}

async fn save_schedule(req: HttpRequest, state: ScheduleState, body: web::Json<Vec<Value>>) -> HttpResponse {
    if !is_admin(&req) {
        return HttpResponse::Forbidden().json(json!({"error": "Admin access required"}));
    }
    *state.lock().unwrap() = body.into_inner();
    HttpResponse::Ok().json(json!({"message": "Schedule saved"}))
}

#[actix_web::test]
async fn remote_schedule_round_trip() {
    let state: ScheduleState = web::Data::new(Mutex::new(Vec::new()));
    let shared = state.clone();
    let base = serve(move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(shared.clone())
            .route("/admin/login", web::post().to(admin_login))
            .route("/admin/schedule", web::get().to(get_schedule))
            .route("/admin/schedule", web::post().to(save_schedule));
    });
    let (client, storage) = client(&base);
    let remote = RemoteScheduleStore::new(client.clone());

    let monday = ScheduleEntry::new(Day::Monday, TimeSlot::At1700, "COURT 8", GroupCode::I1);
    assert!(remote.load().await.is_empty());
    assert!(matches!(
        remote.add(monday.clone()).await,
        Err(ScheduleError::Api(ApiError::MissingToken))
    ));

    client.admin_login("admin", "pw").await.unwrap();
    remote.add(monday.clone()).await.unwrap();
    let tuesday = ScheduleEntry::new(Day::Tuesday, TimeSlot::From1400To1530, "COURT 2", GroupCode::Et);
    remote.add(tuesday.clone()).await.unwrap();
    assert_eq!(remote.load().await, vec![monday.clone(), tuesday.clone()]);
    assert_eq!(state.lock().unwrap()[1]["day"], "MARDI");

    let after = remote.remove(0).await.unwrap();
    assert_eq!(after, vec![tuesday.clone()]);
    assert_eq!(state.lock().unwrap().len(), 1);

    // pulling into the local store
    let local = LocalScheduleStore::new(storage);
    local.replace(&client.fetch_schedule().await.unwrap()).unwrap();
    assert_eq!(local.load().await, vec![tuesday]);
}

async fn availability(path: web::Path<String>) -> HttpResponse {
    if path.into_inner() == "1" {
        HttpResponse::Ok().json(json!([{"day": "Monday", "start_time": "09:00", "end_time": "12:00"}]))
    } else {
        HttpResponse::InternalServerError().finish()
    }
}

#[actix_web::test]
async fn coach_directory_survives_a_failing_coach() {
    let base = serve(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/coaches",
            web::get().to(|| async {
                HttpResponse::Ok().json(json!([
                    {"id": 1, "firstName": "Karim", "lastName": "Ziani", "role": "coach"},
                    {"id": 2, "firstName": "Sara", "lastName": "Amrani", "role": "coach"},
                ]))
            }),
        )
        .route("/coach/availability/{id}", web::get().to(availability));
    });
    let (client, _) = client(&base);

    let listings = client.coach_directory().await.unwrap();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].coach.full_name(), "Karim Ziani");
    assert_eq!(listings[0].availability[0].start_time, "09:00");
    assert!(listings[1].availability.is_empty());
}

async fn assign_player(path: web::Path<String>, body: web::Json<Value>) -> HttpResponse {
    let team_id = path.into_inner();
    let player = body.into_inner()["player_id"].clone();
    HttpResponse::Ok().json(json!({"message": format!("Player {} added to team {}", player.as_str().unwrap_or("?"), team_id)}))
}

#[actix_web::test]
async fn team_assignment_posts_the_player() {
    let base = serve(|cfg: &mut web::ServiceConfig| {
        cfg.route("/teams/{id}/players", web::post().to(assign_player));
    });
    let client = signed_in(&base);

    let ack = client.assign_player("5", "42").await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Player 42 added to team 5"));
}

#[actix_web::test]
async fn team_roster_decodes_backend_records() {
    let base = serve(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/teams/{id}/players",
            web::get().to(|| async {
                HttpResponse::Ok().json(json!([
                    {"id": 11, "firstName": "Ines", "lastName": "Saidi", "role": "player"},
                    {"id": 12, "firstName": "Rayan", "lastName": "Mokrani", "role": "player"},
                ]))
            }),
        );
    });
    let (client, _) = client(&base);

    let members = client.team_members("5").await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].id, RecordId::Int(11));
    assert_eq!(members[1].full_name(), "Rayan Mokrani");
    assert_eq!(members[1].role, Some(Role::Player));
}

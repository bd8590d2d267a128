//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use arena_backend::Trace;
#[cfg(debug_assertions)]
use arena_backend::doc::ApiDoc;
use arena_backend::inbound::http::catalog::{
    create_hero, create_spell, get_hero, get_spell, list_heroes, list_spells, owned_heroes,
    owned_spells,
};
use arena_backend::inbound::http::decks::{
    add_hero, add_spell, create_deck, get_deck, list_decks, remove_hero, remove_spell,
};
use arena_backend::inbound::http::health::{HealthState, live, ready};
use arena_backend::inbound::http::purchases::{buy_hero, buy_spell};
use arena_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // Literal paths precede `{id}` patterns sharing a prefix.
    let api = web::scope("/api/v1")
        .wrap(session)
        .service(list_heroes)
        .service(create_hero)
        .service(buy_hero)
        .service(get_hero)
        .service(list_spells)
        .service(create_spell)
        .service(buy_spell)
        .service(get_spell)
        .service(owned_heroes)
        .service(owned_spells)
        .service(list_decks)
        .service(create_deck)
        .service(add_hero)
        .service(add_spell)
        .service(remove_hero)
        .service(remove_spell)
        .service(get_deck);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build storage, bind the listener and return the running server.
///
/// # Errors
///
/// Propagates storage start-up failures and socket bind errors.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config).await?);
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

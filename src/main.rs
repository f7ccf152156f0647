use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};

use clinic_rbac::config::AppConfig;
use clinic_rbac::handlers::{self, AppState};
use clinic_rbac::navigation::{clinic_nav_sections, clinic_route_tree, load_route_tree};
use clinic_rbac::store::seed::seed_defaults;
use clinic_rbac::store::{MemoryRbacStore, PgRbacStore, RbacStore};

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(startup_error)?;

    let store: Arc<dyn RbacStore> = match &config.database_url {
        Some(url) => {
            let store = PgRbacStore::connect(url).await.map_err(startup_error)?;
            store.migrate().await.map_err(startup_error)?;
            log::info!("Using Postgres store");
            Arc::new(store)
        }
        None => {
            log::warn!("DATABASE_URL not set, using in-memory store (data lost on restart)");
            Arc::new(MemoryRbacStore::new())
        }
    };

    let route_tree = match &config.route_tree_path {
        Some(path) => {
            log::info!("Loading route tree from {}", path.display());
            load_route_tree(path).map_err(startup_error)?
        }
        None => clinic_route_tree(),
    };

    if config.seed_defaults {
        seed_defaults(store.as_ref(), &route_tree)
            .await
            .map_err(startup_error)?;
    }

    let state = web::Data::new(AppState {
        store,
        route_tree,
        nav_sections: clinic_nav_sections(),
        alias_scoring: config.alias_scoring,
    });

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}

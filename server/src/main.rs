use actix::prelude::*;
use colored::Color;
use common::aggregates::pagination::PageRequest;
use common::config::Config;
use common::logger::Logger;
use common::messages::ListRestaurants;
mod seed;
mod server_actors;
use server_actors::services::menus_service::MenusService;
use server_actors::services::nearby_restaurants::NearbyRestaurantsService;
use server_actors::services::restaurants_service::RestaurantsService;
use server_actors::services::reviews_service::ReviewsService;
use server_actors::storage::Storage;

use tokio::signal::ctrl_c;

#[actix::main]
async fn main() -> std::io::Result<()> {
    let logger = Logger::new("Server", Color::Cyan);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            logger.error(format!("Invalid configuration: {}", e));
            std::process::exit(1);
        }
    };
    logger.info(format!(
        "Starting with language {}, nearby radius {} km, {} per page, {} pagination",
        config.default_language,
        config.nearby_radius_km,
        config.page_limit,
        config.pagination_strategy
    ));

    let storage = Storage::new().start();

    if let Some(path) = &config.seed_file {
        if let Err(e) = seed::load(path, &storage, &logger).await {
            logger.error(format!("Could not seed storage: {}", e));
            std::process::exit(1);
        }
    }

    let restaurants = RestaurantsService::new(
        storage.clone(),
        config.default_language,
        config.pagination_strategy,
    )
    .start();
    let _menus = MenusService::new(storage.clone(), config.default_language).start();
    let _reviews = ReviewsService::new(storage.clone(), config.default_language).start();
    let _nearby = NearbyRestaurantsService::new(
        storage.clone(),
        config.nearby_radius_km,
        config.default_language,
        config.pagination_strategy,
    )
    .start();

    match restaurants
        .send(ListRestaurants {
            page: PageRequest::new(1, config.page_limit),
            language: config.default_language,
            origin: None,
        })
        .await
    {
        Ok(page) => {
            for restaurant in &page.items {
                logger.info(format!(
                    "{} · {} · {}",
                    restaurant.name,
                    restaurant.address_line,
                    restaurant
                        .rating
                        .label()
                        .unwrap_or_else(|| "no reviews".to_string())
                ));
            }
            logger.info(format!(
                "{} restaurants on page {}, more pages: {}",
                page.items.len(),
                page.descriptor.page,
                page.descriptor.has_next
            ));
        }
        Err(e) => logger.error(format!("Could not list restaurants: {}", e)),
    }

    tokio::select! {
        _ = ctrl_c() => {
            logger.info("Ctrl-C received, shutting down");
        }
    }

    System::current().stop();
    Ok(())
}

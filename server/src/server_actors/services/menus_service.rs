use crate::server_actors::storage::Storage;
use actix::prelude::*;
use colored::Color;
use common::aggregates::availability::is_open_at;
use common::error::{AppError, AppResult};
use common::localization::{Language, TranslationMap};
use common::logger::Logger;
use common::messages::internal_messages::{
    GetMenu, GetRestaurantMenusWithDishes, InsertDish, InsertMenu, ReplaceMenu,
};
use common::messages::{AddDish, CreateMenu, GetOpenMenus, GetRestaurantMenus, UpdateMenu};
use common::types::dtos::{DishDTO, MenuDTO};
use common::types::schedule::Moment;
use common::types::views::MenuView;
use uuid::Uuid;

/// The `MenusService` actor owns menu and dish edits and renders menus with
/// their availability at a given moment.
pub struct MenusService {
    pub storage_addr: Addr<Storage>,
    pub fallback_language: Language,
    pub logger: Logger,
}

impl MenusService {
    pub fn new(storage_addr: Addr<Storage>, fallback_language: Language) -> Self {
        MenusService {
            storage_addr,
            fallback_language,
            logger: Logger::new("Menus Service", Color::Yellow),
        }
    }
}

/// An inactive menu is always closed. An active menu without a schedule is
/// always open.
pub fn menu_is_open(menu: &MenuDTO, at: Moment) -> bool {
    menu.is_active
        && menu
            .schedule
            .as_ref()
            .is_none_or(|schedule| is_open_at(schedule, at.day, at.time))
}

/// Applies the provided fields of `update` to `menu`.
pub fn apply_update(mut menu: MenuDTO, update: &UpdateMenu) -> MenuDTO {
    let language = update.language.tag();
    if let Some(name) = &update.name {
        menu.name = menu.name.merged(name, language);
    }
    if let Some(description) = &update.description {
        menu.description = menu.description.merged(description, language);
    }
    if let Some(schedule) = &update.schedule {
        menu.schedule = Some(schedule.clone());
    }
    if let Some(price) = update.price {
        menu.price = Some(price);
    }
    if let Some(is_active) = update.is_active {
        menu.is_active = is_active;
    }
    menu
}

async fn render_menus(
    storage_addr: Addr<Storage>,
    restaurant_id: String,
    language: Language,
    fallback: Language,
    at: Moment,
    only_open: bool,
) -> AppResult<Vec<MenuView>> {
    let (menus, dishes) = storage_addr
        .send(GetRestaurantMenusWithDishes { restaurant_id })
        .await?;
    Ok(menus
        .iter()
        .map(|menu| (menu, menu_is_open(menu, at)))
        .filter(|(_, is_open)| *is_open || !only_open)
        .map(|(menu, is_open)| MenuView::localize(menu, &dishes, language, fallback, is_open))
        .collect())
}

impl Actor for MenusService {
    type Context = Context<Self>;
}

impl Handler<CreateMenu> for MenusService {
    type Result = ResponseFuture<AppResult<MenuDTO>>;

    fn handle(&mut self, msg: CreateMenu, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let language = msg.language.tag();
            let menu = MenuDTO {
                menu_id: Uuid::new_v4().to_string(),
                restaurant_id: msg.restaurant_id,
                name: TranslationMap::single(language, msg.name),
                description: TranslationMap::single(language, msg.description),
                schedule: msg.schedule,
                price: msg.price,
                is_active: true,
            };
            storage_addr.send(InsertMenu { menu: menu.clone() }).await??;
            logger.info(format!(
                "Menu {} created for restaurant {}",
                menu.menu_id, menu.restaurant_id
            ));
            Ok(menu)
        })
    }
}

impl Handler<UpdateMenu> for MenusService {
    type Result = ResponseFuture<AppResult<MenuDTO>>;

    fn handle(&mut self, msg: UpdateMenu, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let menu = storage_addr
                .send(GetMenu {
                    menu_id: msg.menu_id.clone(),
                })
                .await?
                .ok_or_else(|| AppError::MenuNotFound(msg.menu_id.clone()))?;
            let menu = apply_update(menu, &msg);
            storage_addr.send(ReplaceMenu { menu: menu.clone() }).await??;
            logger.info(format!("Menu {} updated in {}", menu.menu_id, msg.language));
            Ok(menu)
        })
    }
}

impl Handler<AddDish> for MenusService {
    type Result = ResponseFuture<AppResult<DishDTO>>;

    fn handle(&mut self, msg: AddDish, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();

        Box::pin(async move {
            let language = msg.language.tag();
            let dish = DishDTO {
                dish_id: Uuid::new_v4().to_string(),
                menu_id: msg.menu_id,
                name: TranslationMap::single(language, msg.name),
                description: TranslationMap::single(language, msg.description),
                price: msg.price,
            };
            storage_addr.send(InsertDish { dish: dish.clone() }).await??;
            logger.debug(format!("Dish {} added to menu {}", dish.dish_id, dish.menu_id));
            Ok(dish)
        })
    }
}

impl Handler<GetRestaurantMenus> for MenusService {
    type Result = ResponseFuture<Vec<MenuView>>;

    fn handle(&mut self, msg: GetRestaurantMenus, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();
        let fallback = self.fallback_language;
        let at = msg.at.unwrap_or_else(Moment::now);

        Box::pin(async move {
            render_menus(storage_addr, msg.restaurant_id, msg.language, fallback, at, false)
                .await
                .unwrap_or_else(|e| {
                    logger.error(format!("Error retrieving menus from storage: {}", e));
                    Vec::new()
                })
        })
    }
}

impl Handler<GetOpenMenus> for MenusService {
    type Result = ResponseFuture<Vec<MenuView>>;

    fn handle(&mut self, msg: GetOpenMenus, _ctx: &mut Self::Context) -> Self::Result {
        let storage_addr = self.storage_addr.clone();
        let logger = self.logger.clone();
        let fallback = self.fallback_language;
        let at = msg.at.unwrap_or_else(Moment::now);

        Box::pin(async move {
            render_menus(storage_addr, msg.restaurant_id, msg.language, fallback, at, true)
                .await
                .unwrap_or_else(|e| {
                    logger.error(format!("Error retrieving menus from storage: {}", e));
                    Vec::new()
                })
        })
    }
}

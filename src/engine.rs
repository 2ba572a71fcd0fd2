use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{info, warn};
use uuid::Uuid;

use storepilot_geo::{GeoBounds, GridPoint, GridSize};
use storepilot_path::interpolate;

use crate::animation::{self, AnimationCursor, StepOutcome};
use crate::blackboard::{
    clear_error, new_blackboard, set_error, snapshot, Blackboard, Mode,
};
use crate::bus::Topic;
use crate::persist::ListStore;
use crate::planner::RoutePlanner;
use crate::settings::Settings;
use crate::store::{
    section_center, store_sections, Billing, ItemStatus, Product, ShoppingListItem,
    StoreSection, FALLBACK_ENTRANCE, MAIN_ENTRANCE_ID,
};
use crate::tracking::{
    GeoWatchError, LocationSource, TrackingController, WatchOptions,
};

/// Failures of the navigation engine. None is fatal: every variant leaves
/// the engine in its prior mode.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Your shopping list is empty.")]
    EmptyList,
    #[error("Could not calculate the optimal route.")]
    RouteComputationFailed(#[source] anyhow::Error),
    #[error("An error occurred while adding the item.")]
    ItemLookupFailed(#[source] anyhow::Error),
    #[error("Could not load the product list. Please try again later.")]
    CatalogUnavailable(#[source] anyhow::Error),
    #[error("Sorry, couldn't find a section for \"{0}\".")]
    SectionNotFound(String),
    #[error(transparent)]
    Geolocation(#[from] GeoWatchError),
    #[error("Saved list problem: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Top-level orchestrator: owns the shopping list, sequences the external
/// route collaborator, arms the animation driver, and arbitrates between
/// simulated animation and live tracking.
pub struct NavigationEngine {
    settings: Settings,
    sections: Vec<StoreSection>,
    bounds: GeoBounds,
    grid: GridSize,
    entrance: GridPoint,
    bb: Blackboard,
    positions: Topic<GridPoint>,
    shopping_list: Vec<ShoppingListItem>,
    products: Vec<Product>,
    planner: Box<dyn RoutePlanner>,
    list_store: Box<dyn ListStore>,
    location: Option<Box<dyn LocationSource>>,
    tracking: TrackingController,
    rt: Handle,
}

impl NavigationEngine {
    /// Builds the engine from validated settings. `location` is `None` on
    /// platforms without a geolocation capability; live tracking then fails
    /// with [`GeoWatchError::Unsupported`] while animation mode still works.
    pub fn new(
        settings: Settings,
        planner: Box<dyn RoutePlanner>,
        list_store: Box<dyn ListStore>,
        location: Option<Box<dyn LocationSource>>,
        rt: Handle,
    ) -> anyhow::Result<Self> {
        let bounds = settings.geo_bounds()?;
        let grid = settings.grid_size()?;
        let sections = store_sections();
        let entrance =
            section_center(&sections, MAIN_ENTRANCE_ID).unwrap_or(FALLBACK_ENTRANCE);

        Ok(NavigationEngine {
            settings,
            sections,
            bounds,
            grid,
            entrance,
            bb: new_blackboard(entrance),
            positions: Topic::new(64),
            shopping_list: Vec::new(),
            products: Vec::new(),
            planner,
            list_store,
            location,
            tracking: TrackingController::new(),
            rt,
        })
    }

    pub fn blackboard(&self) -> Blackboard {
        self.bb.clone()
    }

    pub fn positions(&self) -> Topic<GridPoint> {
        self.positions.clone()
    }

    pub fn sections(&self) -> &[StoreSection] {
        &self.sections
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn shopping_list(&self) -> &[ShoppingListItem] {
        &self.shopping_list
    }

    pub fn billing(&self) -> Billing {
        Billing::for_cart(self.shopping_list.iter(), self.settings.store.tax_rate)
    }

    pub fn is_live_tracking(&self) -> bool {
        self.tracking.is_active()
    }

    fn list_items(&self) -> Vec<ShoppingListItem> {
        self.shopping_list
            .iter()
            .filter(|i| i.status == ItemStatus::InList)
            .cloned()
            .collect()
    }

    /// List edits are frozen while a committed route is being animated, and
    /// allowed again once live tracking takes over position ownership.
    fn list_frozen(&self) -> bool {
        snapshot(&self.bb).mode == Mode::Animating
    }

    fn fail(&self, err: EngineError) -> EngineError {
        set_error(&self.bb, err.to_string());
        err
    }

    /// One-shot catalog fetch from the external collaborator.
    pub fn load_catalog(&mut self) -> Result<(), EngineError> {
        match self.planner.catalog(&self.sections) {
            Ok(products) => {
                info!(count = products.len(), "product catalog loaded");
                self.products = products;
                Ok(())
            }
            Err(e) => Err(self.fail(EngineError::CatalogUnavailable(e))),
        }
    }

    /// Resolves a free-text item name to a section and appends it to the
    /// list. A no-op while the list is frozen or the name is blank.
    pub fn add_item(&mut self, name: &str) -> Result<(), EngineError> {
        if name.trim().is_empty() || self.list_frozen() {
            return Ok(());
        }
        clear_error(&self.bb);
        self.bb.write().route.clear();

        let details = self
            .planner
            .resolve_section(name, &self.sections)
            .map_err(|e| self.fail(EngineError::ItemLookupFailed(e)))?;
        match details {
            Some(details) => {
                let item = ShoppingListItem::new(name.trim(), details.price, details.section_id);
                info!(item = %item.name, section = %item.section_id, "item added to list");
                self.shopping_list.push(item);
                Ok(())
            }
            None => Err(self.fail(EngineError::SectionNotFound(name.trim().to_string()))),
        }
    }

    /// Removes a list entry. A no-op while the list is frozen.
    pub fn remove_item(&mut self, id: Uuid) {
        if self.list_frozen() {
            return;
        }
        self.shopping_list.retain(|i| i.id != id);
        self.bb.write().route.clear();
    }

    /// Marks a list entry as picked up. A no-op while the list is frozen.
    pub fn move_to_cart(&mut self, id: Uuid) {
        if self.list_frozen() {
            return;
        }
        if let Some(item) = self.shopping_list.iter_mut().find(|i| i.id == id) {
            item.status = ItemStatus::InCart;
        }
    }

    /// Asks the route collaborator for a visiting order, interpolates the
    /// path from the current position through the section centers, and arms
    /// the animation driver.
    ///
    /// While live tracking is active the route is committed for display but
    /// the animation is not armed; the device keeps position ownership.
    ///
    /// On collaborator failure the mode and position are left unchanged.
    pub fn start_navigation(&mut self) -> Result<(), EngineError> {
        let items = self.list_items();
        if items.is_empty() {
            return Err(self.fail(EngineError::EmptyList));
        }
        clear_error(&self.bb);

        let route = self
            .planner
            .suggest_route(&items, &self.sections)
            .map_err(|e| self.fail(EngineError::RouteComputationFailed(e)))?;

        let centers: Vec<GridPoint> = route
            .iter()
            .filter_map(|id| section_center(&self.sections, id))
            .collect();
        if centers.is_empty() {
            // Nothing to visit; navigation stays inactive.
            return Ok(());
        }

        let start = snapshot(&self.bb).position;
        let mut waypoints = Vec::with_capacity(centers.len() + 1);
        waypoints.push(start);
        waypoints.extend(centers);

        let path = interpolate(&waypoints, self.settings.animation.step_unit)
            .map_err(|e| self.fail(EngineError::RouteComputationFailed(e.into())))?;
        if path.is_empty() {
            return Ok(());
        }

        let mut g = self.bb.write();
        if g.mode == Mode::LiveTracking {
            // Live tracking keeps position ownership: commit the route for
            // display but leave the watch and the mode untouched.
            info!(sections = route.len(), "route committed under live tracking");
            g.route = route;
            return Ok(());
        }
        info!(sections = route.len(), samples = path.len(), "navigation started");
        g.cursor = AnimationCursor::armed(path);
        g.route = route;
        g.mode = Mode::Animating;
        Ok(())
    }

    /// Cancels any animation and clears route state. Unless live tracking
    /// owns the position, the marker returns to the entrance. Idempotent.
    pub fn stop_navigation(&mut self) {
        let mut g = self.bb.write();
        g.cursor.reset();
        g.route.clear();
        if g.mode != Mode::LiveTracking {
            g.mode = Mode::Idle;
            g.position = self.entrance;
            let p = g.position;
            drop(g);
            self.positions.publish(p);
        }
    }

    /// Advances the animation one display frame. Call once per frame from
    /// the render loop.
    pub fn tick_frame(&mut self) -> StepOutcome {
        animation::step_frame(
            &self.bb,
            self.settings.animation.movement_per_frame,
            &self.positions,
        )
    }

    /// Enables live tracking if it is off, disables it if it is on.
    ///
    /// Disabling has full stop semantics: subscription cancelled, position
    /// back at the entrance, route/cursor/error cleared.
    pub fn toggle_live_tracking(&mut self) -> Result<(), EngineError> {
        if self.tracking.is_active() {
            self.tracking.disable();
            let mut g = self.bb.write();
            g.cursor.reset();
            g.route.clear();
            g.mode = Mode::Idle;
            g.position = self.entrance;
            g.error = None;
            let p = g.position;
            drop(g);
            self.positions.publish(p);
            info!("live tracking disabled");
            return Ok(());
        }

        // A watch torn down by an earlier source error leaves a finished
        // task behind; drop it before re-enabling.
        self.tracking.disable();

        let source = match self.location.as_ref() {
            Some(source) => source,
            None => return Err(self.fail(GeoWatchError::Unsupported.into())),
        };
        let subscription = source
            .subscribe(WatchOptions::default())
            .map_err(|e| self.fail(e.into()))?;
        self.tracking.enable(
            &self.rt,
            subscription,
            self.bb.clone(),
            self.positions.clone(),
            self.bounds,
            self.grid,
        );
        Ok(())
    }

    /// Persists the current list, or clears the stored blob when the list
    /// is empty (matching the original save semantics).
    pub fn save_list(&mut self) -> Result<(), EngineError> {
        let result = if self.shopping_list.is_empty() {
            self.list_store.clear()
        } else {
            self.list_store.save(&self.shopping_list)
        };
        result.map_err(|e| self.fail(EngineError::Storage(e)))
    }

    /// Replaces the list from storage and performs a full navigation stop,
    /// since any committed route no longer matches the loaded list.
    pub fn load_list(&mut self) -> Result<(), EngineError> {
        match self.list_store.load() {
            Ok(Some(items)) => {
                info!(count = items.len(), "shopping list loaded");
                self.shopping_list = items;
                self.stop_navigation();
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                // A corrupted blob is cleared so the next load starts clean.
                if let Err(clear_err) = self.list_store.clear() {
                    warn!(error = %clear_err, "failed to clear corrupted saved list");
                }
                Err(self.fail(EngineError::Storage(e)))
            }
        }
    }
}

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::auth::UserDirectory;
use crate::calculator::CalorieEstimate;
use crate::catalog::FoodItem;
use crate::dashboard::{Dashboard, HomeView};
use crate::error::{LighterError, Result};
use crate::goal::{GoalRecord, GoalRequest};
use crate::models::{MealEntry, MealStore, Username};
use crate::session::{SessionStore, SessionToken};
use crate::tracker::Tracker;

/// Today's date on the server's clock.
#[must_use]
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Session-aware entry point: every operation names its caller by token.
pub struct LighterService {
    users: Arc<dyn UserDirectory>,
    sessions: SessionStore,
    tracker: Tracker,
    today: fn() -> NaiveDate,
}

impl LighterService {
    pub fn new(users: Arc<dyn UserDirectory>, tracker: Tracker) -> Self {
        Self {
            users,
            sessions: SessionStore::new(),
            tracker,
            today: local_today,
        }
    }

    /// Replace the clock, e.g. to pin "today" in tests.
    #[must_use]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn login(&self, username: &str, password: &str) -> Result<SessionToken> {
        let user = Username::new(username).map_err(|_| LighterError::Auth)?;
        if !self.users.verify(user.as_str(), password) {
            warn!(user = %user, "login rejected");
            return Err(LighterError::Auth);
        }
        info!(user = %user, "login");
        Ok(self.sessions.create(user))
    }

    pub fn logout(&self, token: &SessionToken) {
        if let Some(user) = self.sessions.resolve(token) {
            self.sessions.remove(token);
            info!(user = %user, "logout");
        }
    }

    pub fn authenticate(&self, token: &SessionToken) -> Result<Username> {
        self.sessions
            .resolve(token)
            .ok_or(LighterError::InvalidSession)
    }

    #[must_use]
    pub fn foods(&self) -> Vec<FoodItem> {
        self.tracker.foods()
    }

    pub fn home(&self, token: &SessionToken) -> Result<HomeView> {
        let user = self.authenticate(token)?;
        self.tracker.home(&user, (self.today)())
    }

    pub fn dashboard(&self, token: &SessionToken) -> Result<Dashboard> {
        let user = self.authenticate(token)?;
        self.tracker.dashboard(&user, (self.today)())
    }

    pub fn tracker(&self, token: &SessionToken) -> Result<MealStore> {
        let user = self.authenticate(token)?;
        self.tracker.meals(&user)
    }

    pub fn calculate_calories(
        &self,
        token: &SessionToken,
        food: &str,
        amount: f64,
        meal: &str,
    ) -> Result<CalorieEstimate> {
        self.authenticate(token)?;
        self.tracker.calculate(food, amount, meal)
    }

    pub fn log_meal(&self, token: &SessionToken, entry: MealEntry) -> Result<String> {
        let user = self.authenticate(token)?;
        self.tracker.log_meal(&user, entry, (self.today)())
    }

    pub fn log_weight(
        &self,
        token: &SessionToken,
        date: Option<&str>,
        weight: f64,
    ) -> Result<String> {
        let user = self.authenticate(token)?;
        self.tracker.log_weight(&user, date, weight, (self.today)())
    }

    pub fn set_goal(&self, token: &SessionToken, req: &GoalRequest) -> Result<GoalRecord> {
        let user = self.authenticate(token)?;
        self.tracker.set_goal(&user, req)
    }
}

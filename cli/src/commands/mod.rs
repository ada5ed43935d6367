mod dashboard;
mod foods;
mod goal;
mod helpers;
mod log;
mod user;
mod weight;

pub(crate) use dashboard::{cmd_dashboard, cmd_tracker};
pub(crate) use foods::{cmd_calc, cmd_foods};
pub(crate) use goal::cmd_goal_set;
pub(crate) use log::{LogArgs, cmd_log};
pub(crate) use user::{cmd_user_add, cmd_user_list, cmd_user_remove};
pub(crate) use weight::cmd_weight_log;

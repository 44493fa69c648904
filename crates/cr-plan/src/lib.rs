//! `cr-plan`: tour sequencing, instruction compilation, and the planner.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`planner`]     | `DeliveryPlanner`, `DeliveryPlan`, `DeliveryResult`     |
//! | [`sequencer`]   | `Sequencer` trait, `NearestNeighbor`, `InputOrder`      |
//! | [`compiler`]    | `RouteCompiler`, `CompiledRoute`, `fold_leg`            |
//! | [`instruction`] | `Instruction`, `Compass`, `TurnSide`                    |
//! | [`deliveries`]  | Deliveries file loader                                  |
//! | [`report`]      | CSV export of instructions                              |
//! | [`error`]       | `PlanError`, `PlanResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `DeliveryPlanner::plan_batch` runs on Rayon.            |
//! | `serde`    | Derives `Serialize`/`Deserialize` on plan types.        |

pub mod compiler;
pub mod deliveries;
pub mod error;
pub mod instruction;
pub mod planner;
pub mod report;
pub mod sequencer;

#[cfg(test)]
mod tests;

pub use compiler::{CompiledRoute, LegSummary, RouteCompiler, fold_leg};
pub use deliveries::{DeliveryFile, load_deliveries, load_deliveries_reader};
pub use error::{PlanError, PlanResult};
pub use instruction::{Compass, Instruction, TurnSide};
pub use planner::{DeliveryPlan, DeliveryPlanner, DeliveryResult};
pub use report::{write_instructions_csv, write_instructions_csv_file};
pub use sequencer::{InputOrder, NearestNeighbor, Sequencer, TourOrder, crow_miles};

//! Stage-by-stage planning wizard
//!
//! [`Wizard`] owns the session state and the model client. Front ends feed it
//! [`Edit`]s and navigation signals and render its [`StageView`].

mod edit;
mod error;
mod machine;
mod stage;
mod state;
mod view;

pub use edit::{Edit, INPUT_FIELDS};
pub use error::WizardError;
pub use machine::{StageStatus, Wizard};
pub use stage::Stage;
pub use state::WizardState;
pub use view::{ChoiceGroup, ChoiceView, FieldView, PlanOverview, StageView};

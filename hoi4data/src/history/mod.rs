//! Files under `history/`.

pub mod countries;
pub mod states;

pub use countries::{CountryHistory, load_country_histories};
pub use states::{State, StateHistory, VictoryPoint, load_states_dir, parse_state, write_state};

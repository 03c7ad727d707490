pub mod admin;
pub mod config;
pub mod expense;
pub mod member;
pub mod month;
pub mod report;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        month::definitions(),
        member::definitions(),
        expense::definitions(),
        report::definitions(),
        admin::definitions(),
        config::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

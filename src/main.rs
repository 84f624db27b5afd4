//! rMealTicket main entrypoint.

use rmealticket::run;
use rmealticket::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}

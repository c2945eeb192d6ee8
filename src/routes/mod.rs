use actix_files as fs;

use actix_web::web::{scope, ServiceConfig};
use actix_web::Scope;
use accounts::get_chart_of_accounts;
use currencies::{get_currencies, set_base_currency};
use settings::{get_company_settings, remove_logo, update_company_settings};
mod accounts;
mod currencies;
mod health_check;
mod settings;

use crate::routes::health_check::*;

const LOGOS_DIR: &str = "./storage/logos";

fn util_routes() -> Scope {
    scope("").service(health_check)
}

fn settings_routes() -> Scope {
    scope("settings")
        .service(get_company_settings)
        .service(update_company_settings)
        .service(remove_logo)
}

fn currencies_routes() -> Scope {
    scope("currencies")
        .service(get_currencies)
        .service(set_base_currency)
}

fn accounts_routes() -> Scope {
    scope("accounts").service(get_chart_of_accounts)
}

fn static_files_routes() -> Scope {
    // Serve uploaded logos from `/static/logos/`
    scope("static").service(fs::Files::new("/logos", LOGOS_DIR))
}

pub fn ledgerly_routes(conf: &mut ServiceConfig) {
    conf.service(
        scope("api/v1")
            .service(settings_routes())
            .service(currencies_routes())
            .service(accounts_routes())
            .service(static_files_routes())
            .service(util_routes()),
    );
}

use crate::generator::profile::PlacementPlan;
use crate::gui_bridge::model::{DashboardModel, PlaceRequest, PlacementView};
use crate::workflow::runner::Runner;
use drishticore::catalog::ANOMALY_DEFINITIONS;
use log::{info, warn};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

fn with_runner(
    runner: Arc<Runner>,
) -> impl Filter<Extract = (Arc<Runner>,), Error = Infallible> + Clone {
    warp::any().map(move || runner.clone())
}

fn status(body: serde_json::Value, code: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&body), code)
}

async fn place_anomaly(request: PlaceRequest, runner: Arc<Runner>) -> Result<impl Reply, Rejection> {
    let plan = PlacementPlan {
        kind: request.kind,
        position: request.position,
        inputs: request
            .input_values
            .unwrap_or_else(|| request.kind.definition().default_inputs()),
    };
    match runner.place(&plan, request.route.as_ref()).await {
        Ok(outcome) => {
            let view = PlacementView::from(outcome);
            Ok(warp::reply::with_status(warp::reply::json(&view), StatusCode::OK))
        }
        Err(err) => {
            warn!("placement rejected: {:#}", err);
            Ok(status(json!({ "error": format!("{:#}", err) }), StatusCode::BAD_REQUEST))
        }
    }
}

/// HTTP surface over a running simulation session.
pub struct GuiBridge {
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self { runner }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let runner = self.runner.clone();

        let state_route = warp::path("state")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_runner(runner.clone()))
            .map(|runner: Arc<Runner>| warp::reply::json(&DashboardModel::capture(&runner)));

        let sensors_route = warp::path("sensors")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_runner(runner.clone()))
            .map(|runner: Arc<Runner>| warp::reply::json(&runner.registry().nodes()));

        let catalog_route = warp::path("catalog")
            .and(warp::path::end())
            .and(warp::get())
            .map(|| warp::reply::json(&ANOMALY_DEFINITIONS.as_slice()));

        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_runner(runner.clone()))
            .map(|runner: Arc<Runner>| warp::reply::json(&runner.metrics().snapshot()));

        let place_route = warp::path("anomalies")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_runner(runner.clone()))
            .and_then(place_anomaly);

        let clear_route = warp::path("anomalies")
            .and(warp::path::end())
            .and(warp::delete())
            .and(with_runner(runner.clone()))
            .map(|runner: Arc<Runner>| {
                runner.clear_all();
                status(json!({ "status": "ok" }), StatusCode::OK)
            });

        let acknowledge_route = warp::path!("alerts" / String / "acknowledge")
            .and(warp::post())
            .and(with_runner(runner.clone()))
            .map(|id: String, runner: Arc<Runner>| {
                if runner.store().acknowledge_alert(&id) {
                    status(json!({ "status": "ok", "id": id }), StatusCode::OK)
                } else {
                    status(json!({ "error": "unknown alert", "id": id }), StatusCode::NOT_FOUND)
                }
            });

        let notifications_route = warp::path("notifications")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_runner(runner.clone()))
            .map(|runner: Arc<Runner>| warp::reply::json(&runner.notifications().notifications()));

        let dismiss_route = warp::path!("notifications" / String)
            .and(warp::delete())
            .and(with_runner(runner.clone()))
            .map(|id: String, runner: Arc<Runner>| {
                runner.notifications().dismiss_notification(&id);
                status(json!({ "status": "ok" }), StatusCode::OK)
            });

        let open_route = warp::path!("notifications" / String / "open")
            .and(warp::post())
            .and(with_runner(runner))
            .map(|id: String, runner: Arc<Runner>| {
                let notifications = runner.notifications();
                let alert_id = notifications
                    .notifications()
                    .into_iter()
                    .find(|n| n.id == id)
                    .and_then(|n| n.alert_id);
                match alert_id {
                    Some(alert_id) => {
                        let route = notifications.navigate_to_alert(&alert_id);
                        status(json!({ "route": route, "alertId": alert_id }), StatusCode::OK)
                    }
                    None => {
                        notifications.dismiss_notification(&id);
                        status(json!({ "route": null }), StatusCode::OK)
                    }
                }
            });

        state_route
            .or(sensors_route)
            .or(catalog_route)
            .or(metrics_route)
            .or(place_route)
            .or(clear_route)
            .or(acknowledge_route)
            .or(notifications_route)
            .or(dismiss_route)
            .or(open_route)
    }

    pub async fn serve(self, addr: SocketAddr) {
        info!("GUI bridge listening on http://{}", addr);
        warp::serve(self.routes()).run(addr).await;
    }
}

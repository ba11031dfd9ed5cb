//! Integration tests for `GmClient` using wiremock HTTP mocks.

use carlink_core::{EngineActionStatus, ErrorKind, RequestContext};
use carlink_gm::{CoercionError, EngineCommand, GmClient, GmError, VehicleConnector};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GmClient {
    GmClient::with_base_url(base_url, 5, 5, "carlink-test")
        .expect("client construction should not fail")
}

fn ctx() -> RequestContext {
    RequestContext::new("test-request", "GET", "/vehicles/1234")
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/{endpoint}")))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn get_vehicle_returns_flattened_record() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "service": "getVehicleInfo",
        "status": "200",
        "data": {
            "vin": { "type": "String", "value": "123123412412" },
            "color": { "type": "String", "value": "Metallic Silver" },
            "fourDoorSedan": { "type": "Boolean", "value": "True" },
            "twoDoorCoupe": { "type": "Boolean", "value": "False" },
            "driveTrain": { "type": "String", "value": "v8" }
        }
    });

    Mock::given(method("POST"))
        .and(path("/getVehicleInfoService"))
        .and(body_json(serde_json::json!({ "id": "1234", "responseType": "JSON" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let vehicle = client
        .get_vehicle(&ctx(), 1234)
        .await
        .expect("should parse vehicle");

    assert_eq!(vehicle.vin, "123123412412");
    assert_eq!(vehicle.color, "Metallic Silver");
    assert!(vehicle.is_four_door);
    assert!(!vehicle.is_two_door);
    assert_eq!(vehicle.drive_train, "v8");
}

#[tokio::test]
async fn status_inside_200_response_is_a_logical_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getVehicleInfoService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "service": "getVehicleInfo",
            "status": "400",
            "reason": "Required field 'id' not found."
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client.get_vehicle(&ctx(), 1234).await.unwrap_err();
    match &err {
        GmError::UpstreamLogical { status, reason } => {
            assert_eq!(*status, 400);
            assert_eq!(reason, "Required field 'id' not found.");
        }
        other => panic!("expected UpstreamLogical, got {other:?}"),
    }

    let classified = VehicleConnector::get_vehicle(&client, &ctx(), 1234)
        .await
        .unwrap_err();
    assert_eq!(classified.http_status(), 500);
    assert_eq!(classified.kind(), ErrorKind::UpstreamLogical);
    assert_eq!(classified.client_message(), "Failed to get vehicle");
    assert!(
        classified.cause().contains("Required field 'id' not found."),
        "cause: {}",
        classified.cause()
    );
    assert!(classified.cause().contains("Response code: 400"));
}

#[tokio::test]
async fn energy_levels_map_null_to_absent() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getEnergyService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "service": "getEnergyService",
            "status": "200",
            "data": {
                "tankLevel": { "type": "Number", "value": "30.2" },
                "batteryLevel": { "type": "Null", "value": "null" }
            }
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let energy = client.get_energy_levels(&ctx(), 1234).await.unwrap();

    assert_eq!(energy.fuel_percent, Some(30.2));
    assert_eq!(energy.battery_percent, None);
}

#[tokio::test]
async fn null_energy_data_reports_both_levels_absent() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getEnergyService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "service": "getEnergyService",
            "status": "200",
            "data": null
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let energy = client.get_energy_levels(&ctx(), 1234).await.unwrap();

    assert_eq!(energy.fuel_percent, None);
    assert_eq!(energy.battery_percent, None);
}

#[tokio::test]
async fn vendor_reason_survives_null_data() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getEnergyService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "service": "getEnergyService",
            "status": "404",
            "reason": "Vehicle id: 1236 not found.",
            "data": null
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client.get_energy_levels(&ctx(), 1236).await.unwrap_err();
    match &err {
        GmError::UpstreamLogical { status, reason } => {
            assert_eq!(*status, 404);
            assert_eq!(reason, "Vehicle id: 1236 not found.");
        }
        other => panic!("expected UpstreamLogical, got {other:?}"),
    }
}

#[tokio::test]
async fn doors_are_coerced_in_order() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getSecurityStatusService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "service": "getSecurityStatus",
            "status": "200",
            "data": {
                "doors": {
                    "type": "Array",
                    "values": [
                        {
                            "location": { "type": "String", "value": "frontLeft" },
                            "locked": { "type": "Boolean", "value": "False" }
                        },
                        {
                            "location": { "type": "String", "value": "frontRight" },
                            "locked": { "type": "Boolean", "value": "True" }
                        }
                    ]
                }
            }
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let doors = client.get_vehicle_doors(&ctx(), 1234).await.unwrap();

    assert_eq!(doors.len(), 2);
    assert_eq!(doors[0].location, "frontLeft");
    assert!(!doors[0].locked);
    assert_eq!(doors[1].location, "frontRight");
    assert!(doors[1].locked);
}

#[tokio::test]
async fn doors_not_tagged_as_array_are_rejected() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getSecurityStatusService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "200",
            "data": { "doors": { "type": "Object", "values": [] } }
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client.get_vehicle_doors(&ctx(), 1234).await.unwrap_err();
    assert!(
        matches!(err, GmError::UnexpectedDataShape { .. }),
        "got {err:?}"
    );

    let classified = VehicleConnector::get_vehicle_doors(&client, &ctx(), 1234)
        .await
        .unwrap_err();
    assert_eq!(classified.kind(), ErrorKind::UnexpectedDataShape);
    assert_eq!(classified.client_message(), "Failed to get vehicle doors");
}

#[tokio::test]
async fn one_bad_door_fails_the_whole_listing() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getSecurityStatusService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "200",
            "data": {
                "doors": {
                    "type": "Array",
                    "values": [
                        {
                            "location": { "type": "String", "value": "frontLeft" },
                            "locked": { "type": "Boolean", "value": "True" }
                        },
                        {
                            "location": { "type": "String", "value": "backLeft" },
                            "locked": { "type": "Boolean", "value": "maybe" }
                        }
                    ]
                }
            }
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client.get_vehicle_doors(&ctx(), 1234).await.unwrap_err();
    match err {
        GmError::Coercion { source, body } => {
            assert!(matches!(source, CoercionError::UnparsableBoolean { .. }));
            assert!(body.contains("maybe"));
        }
        other => panic!("expected Coercion, got {other:?}"),
    }
}

#[tokio::test]
async fn non_200_transport_status_is_reported_with_body() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getEnergyService",
        ResponseTemplate::new(503).set_body_string("service unavailable"),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client.get_energy_levels(&ctx(), 1234).await.unwrap_err();
    match &err {
        GmError::UpstreamHttp { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "service unavailable");
        }
        other => panic!("expected UpstreamHttp, got {other:?}"),
    }

    let classified = err.classify(carlink_gm::Operation::GetEnergy);
    assert_eq!(classified.http_status(), 500);
    assert_eq!(
        classified.client_message(),
        "Failed to get vehicle energy status"
    );
}

#[tokio::test]
async fn malformed_json_is_a_malformed_envelope() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getVehicleInfoService",
        ResponseTemplate::new(200).set_body_string("{ not json"),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client.get_vehicle(&ctx(), 1234).await.unwrap_err();
    assert!(
        matches!(err, GmError::MalformedEnvelope { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn non_numeric_status_is_an_invalid_status_code() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getVehicleInfoService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "data": {}
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let classified = VehicleConnector::get_vehicle(&client, &ctx(), 1234)
        .await
        .unwrap_err();
    assert_eq!(classified.kind(), ErrorKind::InvalidStatusCode);
    assert_eq!(classified.client_message(), "Failed to parse status code");
    assert_eq!(classified.http_status(), 500);
}

#[tokio::test]
async fn missing_status_is_an_invalid_status_code() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getVehicleInfoService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "reason": "x",
            "data": {}
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client.get_vehicle(&ctx(), 1234).await.unwrap_err();
    assert!(
        matches!(err, GmError::InvalidStatusCode { .. }),
        "got {err:?}"
    );

    let classified = VehicleConnector::get_vehicle(&client, &ctx(), 1234)
        .await
        .unwrap_err();
    assert_eq!(classified.kind(), ErrorKind::InvalidStatusCode);
    assert_eq!(classified.client_message(), "Failed to parse status code");
}

#[tokio::test]
async fn unreachable_vendor_is_a_transport_error() {
    // Port 9 (discard) is closed on CI hosts, so the connect fails fast.
    let client = test_client("http://127.0.0.1:9");
    let classified = VehicleConnector::get_vehicle(&client, &ctx(), 1234)
        .await
        .unwrap_err();
    assert_eq!(classified.kind(), ErrorKind::Transport);
    assert_eq!(classified.client_message(), "Internal Error");
    assert_eq!(classified.internal_message(), "GetVehicle: Failed to send request");
}

#[tokio::test]
async fn engine_action_sends_command_and_maps_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/actionEngineService"))
        .and(body_json(serde_json::json!({
            "id": "1234",
            "responseType": "JSON",
            "command": "START_VEHICLE"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "service": "actionEngine",
            "status": "200",
            "actionResult": { "status": "EXECUTED" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/actionEngineService"))
        .and(body_json(serde_json::json!({
            "id": "1234",
            "responseType": "JSON",
            "command": "STOP_VEHICLE"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "service": "actionEngine",
            "status": "200",
            "actionResult": { "status": "FAILED" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());

    let started = client
        .send_engine_action(&ctx(), 1234, EngineCommand::StartVehicle)
        .await
        .unwrap();
    assert_eq!(started.status, EngineActionStatus::Executed);

    let stopped = client
        .send_engine_action(&ctx(), 1234, EngineCommand::StopVehicle)
        .await
        .unwrap();
    assert_eq!(stopped.status, EngineActionStatus::Failed);
}

#[tokio::test]
async fn unknown_engine_result_is_unsupported() {
    let server = MockServer::start().await;
    mount(
        &server,
        "actionEngineService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "200",
            "actionResult": { "status": "PENDING" }
        })),
    )
    .await;

    let client = test_client(&server.uri());
    let err = client
        .send_engine_action(&ctx(), 1234, EngineCommand::StartVehicle)
        .await
        .unwrap_err();
    match err {
        GmError::Coercion { source, .. } => {
            assert_eq!(
                source,
                CoercionError::UnsupportedDataType("PENDING".to_string())
            );
        }
        other => panic!("expected Coercion, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_action_result_is_an_unexpected_shape() {
    let server = MockServer::start().await;
    mount(
        &server,
        "actionEngineService",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "200" })),
    )
    .await;

    let client = test_client(&server.uri());
    let classified = VehicleConnector::send_engine_action(
        &client,
        &ctx(),
        1234,
        EngineCommand::StopVehicle,
    )
    .await
    .unwrap_err();
    assert_eq!(classified.kind(), ErrorKind::UnexpectedDataShape);
    assert_eq!(classified.client_message(), "Failed to send engine action");
}

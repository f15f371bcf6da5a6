//! Protocol message definitions

pub mod jsonrpc;
pub mod notification;
pub mod request;
pub mod response;

pub use {
    jsonrpc::{JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId},
    notification::{NetworkEventKind, NetworkEventParams, Notification},
    request::{ConnectToWifiParams, Request},
    response::{ConnectToWifiResponse, Response, StatusResponse},
};

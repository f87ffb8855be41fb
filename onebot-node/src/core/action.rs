//! The closed set of resources and operations the node exposes.
//!
//! Every operation maps to exactly one OneBot v11 endpoint. The HTTP method
//! and the body fields of each endpoint are fixed here rather than inferred
//! from the request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// HTTP Method
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

// ============================================================================
// Resource
// ============================================================================

/// Category of API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Bot,
    Friend,
    Group,
    Message,
    Misc,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Bot,
        Resource::Friend,
        Resource::Group,
        Resource::Message,
        Resource::Misc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Bot => "bot",
            Resource::Friend => "friend",
            Resource::Group => "group",
            Resource::Message => "message",
            Resource::Misc => "misc",
        }
    }

    /// Operations valid for this resource
    pub fn operations(self) -> &'static [Operation] {
        match self {
            Resource::Bot => &[Operation::GetLoginInfo],
            Resource::Friend => &[Operation::GetFriendList, Operation::GetStrangerInfo],
            Resource::Group => &[
                Operation::GetGroupInfo,
                Operation::GetGroupList,
                Operation::GetGroupMemberInfo,
                Operation::GetGroupMemberList,
            ],
            Resource::Message => &[Operation::SendPrivateMsg, Operation::SendGroupMsg],
            Resource::Misc => &[Operation::GetStatus, Operation::GetVersionInfo],
        }
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::UnknownResource(s.to_string()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Per-item parameter placed into a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Message,
    UserId,
    GroupId,
}

impl Param {
    pub fn name(self) -> &'static str {
        match self {
            Param::Message => "message",
            Param::UserId => "user_id",
            Param::GroupId => "group_id",
        }
    }
}

// ============================================================================
// Operation
// ============================================================================

/// A OneBot v11 API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetLoginInfo,
    GetFriendList,
    GetStrangerInfo,
    GetGroupInfo,
    GetGroupList,
    GetGroupMemberInfo,
    GetGroupMemberList,
    SendPrivateMsg,
    SendGroupMsg,
    GetStatus,
    GetVersionInfo,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::GetLoginInfo,
        Operation::GetFriendList,
        Operation::GetStrangerInfo,
        Operation::GetGroupInfo,
        Operation::GetGroupList,
        Operation::GetGroupMemberInfo,
        Operation::GetGroupMemberList,
        Operation::SendPrivateMsg,
        Operation::SendGroupMsg,
        Operation::GetStatus,
        Operation::GetVersionInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetLoginInfo => "get_login_info",
            Operation::GetFriendList => "get_friend_list",
            Operation::GetStrangerInfo => "get_stranger_info",
            Operation::GetGroupInfo => "get_group_info",
            Operation::GetGroupList => "get_group_list",
            Operation::GetGroupMemberInfo => "get_group_member_info",
            Operation::GetGroupMemberList => "get_group_member_list",
            Operation::SendPrivateMsg => "send_private_msg",
            Operation::SendGroupMsg => "send_group_msg",
            Operation::GetStatus => "get_status",
            Operation::GetVersionInfo => "get_version_info",
        }
    }

    pub fn resource(self) -> Resource {
        match self {
            Operation::GetLoginInfo => Resource::Bot,
            Operation::GetFriendList | Operation::GetStrangerInfo => Resource::Friend,
            Operation::GetGroupInfo
            | Operation::GetGroupList
            | Operation::GetGroupMemberInfo
            | Operation::GetGroupMemberList => Resource::Group,
            Operation::SendPrivateMsg | Operation::SendGroupMsg => Resource::Message,
            Operation::GetStatus | Operation::GetVersionInfo => Resource::Misc,
        }
    }

    /// Body fields, in the order they are read from the item.
    pub fn params(self) -> &'static [Param] {
        match self {
            Operation::SendPrivateMsg => &[Param::Message, Param::UserId],
            Operation::GetStrangerInfo => &[Param::UserId],
            Operation::SendGroupMsg => &[Param::Message, Param::GroupId],
            Operation::GetGroupMemberList | Operation::GetGroupInfo => &[Param::GroupId],
            Operation::GetGroupMemberInfo => &[Param::GroupId, Param::UserId],
            Operation::GetLoginInfo
            | Operation::GetFriendList
            | Operation::GetGroupList
            | Operation::GetStatus
            | Operation::GetVersionInfo => &[],
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Operation::SendPrivateMsg
            | Operation::SendGroupMsg
            | Operation::GetStrangerInfo
            | Operation::GetGroupInfo
            | Operation::GetGroupMemberInfo
            | Operation::GetGroupMemberList => HttpMethod::Post,
            Operation::GetLoginInfo
            | Operation::GetFriendList
            | Operation::GetGroupList
            | Operation::GetStatus
            | Operation::GetVersionInfo => HttpMethod::Get,
        }
    }

    pub fn endpoint(self) -> String {
        normalize_endpoint(self.as_str())
    }

    /// Endpoint used when several items are merged into one forwarded message.
    pub fn forward_endpoint(self) -> Option<&'static str> {
        match self {
            Operation::SendPrivateMsg => Some("/send_private_forward_msg"),
            Operation::SendGroupMsg => Some("/send_group_forward_msg"),
            _ => None,
        }
    }

    /// Recipient field of a message-send operation.
    pub fn target(self) -> Option<Param> {
        match self {
            Operation::SendPrivateMsg => Some(Param::UserId),
            Operation::SendGroupMsg => Some(Param::GroupId),
            _ => None,
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix('/').unwrap_or(s);
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Action
// ============================================================================

/// A validated (resource, operation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub resource: Resource,
    pub operation: Operation,
}

impl Action {
    pub fn new(resource: Resource, operation: Operation) -> Result<Self> {
        if operation.resource() != resource {
            return Err(Error::OperationMismatch {
                resource: resource.to_string(),
                operation: operation.to_string(),
            });
        }
        Ok(Self {
            resource,
            operation,
        })
    }

    pub fn parse(resource: &str, operation: &str) -> Result<Self> {
        Self::new(resource.parse()?, operation.parse()?)
    }
}

/// Prefix `endpoint` with `/` unless it already has one.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{}", endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_belongs_to_its_resource_list() {
        for op in Operation::ALL {
            assert!(op.resource().operations().contains(&op), "{}", op);
        }
        let listed: usize = Resource::ALL.iter().map(|r| r.operations().len()).sum();
        assert_eq!(listed, Operation::ALL.len());
    }

    #[test]
    fn method_follows_body_fields() {
        for op in Operation::ALL {
            let expected = if op.params().is_empty() {
                HttpMethod::Get
            } else {
                HttpMethod::Post
            };
            assert_eq!(op.method(), expected, "{}", op);
        }
    }

    #[test]
    fn endpoint_normalization() {
        assert_eq!(normalize_endpoint("get_status"), "/get_status");
        assert_eq!(normalize_endpoint("/get_status"), "/get_status");
        assert_eq!(Operation::SendGroupMsg.endpoint(), "/send_group_msg");
    }

    #[test]
    fn parse_rejects_unknown_and_mismatched_pairs() {
        let action = Action::parse("group", "get_group_info").unwrap();
        assert_eq!(action.operation, Operation::GetGroupInfo);

        assert!(matches!(
            Action::parse("guild", "get_group_info"),
            Err(Error::UnknownResource(_))
        ));
        assert!(matches!(
            Action::parse("group", "set_group_kick"),
            Err(Error::UnknownOperation(_))
        ));
        assert!(matches!(
            Action::parse("bot", "send_group_msg"),
            Err(Error::OperationMismatch { .. })
        ));
    }

    #[test]
    fn forward_endpoints_only_for_message_sends() {
        assert_eq!(
            Operation::SendPrivateMsg.forward_endpoint(),
            Some("/send_private_forward_msg")
        );
        assert_eq!(Operation::SendGroupMsg.target(), Some(Param::GroupId));
        assert_eq!(Operation::GetStatus.forward_endpoint(), None);
    }
}

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Envelope of every OneBot v11 HTTP response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub retcode: i64,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub wording: Option<String>,
}

impl ApiResponse {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok" && self.retcode == 0
    }

    pub fn ensure_ok(&self, action: &str) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::Api {
                action: action.to_string(),
                status: self.status.clone(),
                retcode: self.retcode,
            })
        }
    }

    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    pub fn data_as_checked<T: DeserializeOwned>(&self, action: &str) -> Result<T> {
        self.ensure_ok(action)?;
        self.data_as()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInfo {
    pub user_id: i64,
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FriendInfo {
    pub user_id: i64,
    pub nickname: String,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupInfo {
    pub group_id: i64,
    pub group_name: String,
    pub member_count: Option<i32>,
    pub max_member_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupMemberInfo {
    pub group_id: Option<i64>,
    pub user_id: i64,
    pub nickname: String,
    pub card: Option<String>,
    pub role: Option<String>,
}

/// One entry of a merged forward message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ForwardNode {
    #[serde(rename = "node")]
    Node {
        name: String,
        uin: String,
        content: String,
    },
}

impl ForwardNode {
    /// Node posted under the bot's own identity.
    pub fn from_bot(login: &LoginInfo, content: impl Into<String>) -> Self {
        ForwardNode::Node {
            name: login.nickname.clone(),
            uin: login.user_id.to_string(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn api_response_check_ok_and_decode() {
        let resp = ApiResponse::from_value(json!({
            "status": "ok",
            "retcode": 0,
            "data": { "user_id": 1, "nickname": "bot" },
        }))
        .unwrap();

        let data: LoginInfo = resp.data_as_checked("get_login_info").unwrap();
        assert_eq!(data.user_id, 1);
        assert_eq!(data.nickname, "bot");
    }

    #[test]
    fn api_response_check_err() {
        let resp = ApiResponse::from_value(json!({
            "status": "failed",
            "retcode": 1400,
            "data": null,
        }))
        .unwrap();

        let err = resp.ensure_ok("get_friend_list").unwrap_err();
        assert!(err.to_string().contains("get_friend_list"));
        assert!(err.to_string().contains("1400"));
    }

    #[test]
    fn forward_node_wire_shape() {
        let login = LoginInfo {
            user_id: 42,
            nickname: "bot".into(),
        };
        let node = ForwardNode::from_bot(&login, "hi");
        assert_eq!(
            serde_json::to_value(node).unwrap(),
            json!({ "type": "node", "data": { "name": "bot", "uin": "42", "content": "hi" } })
        );
    }
}

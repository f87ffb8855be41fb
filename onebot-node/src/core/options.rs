//! Dropdown population for the user, group and member pickers.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::core::action::Operation;
use crate::core::host::{LoadOptionsContext, params, value_to_id};
use crate::core::request::RequestSpec;
use crate::error::{Error, Result};
use crate::onebot::model::{ApiResponse, FriendInfo, GroupInfo, GroupMemberInfo};

/// Host method names for the option loaders.
pub mod methods {
    pub const GET_FRIEND_LIST: &str = "getFriendList";
    pub const GET_GROUP_LIST: &str = "getGroupList";
    pub const GET_GROUP_MEMBER_LIST: &str = "getGroupMemberList";

    pub const ALL: [&str; 3] = [GET_FRIEND_LIST, GET_GROUP_LIST, GET_GROUP_MEMBER_LIST];
}

/// One selectable entry of a dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOption {
    pub name: String,
    pub value: Value,
    pub description: String,
}

impl NodeOption {
    fn with_id(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            value: Value::from(id),
            description: id.to_string(),
        }
    }
}

/// Run the loader registered under `method`.
pub async fn load_options<C>(ctx: &C, method: &str) -> Result<Vec<NodeOption>>
where
    C: LoadOptionsContext + ?Sized,
{
    match method {
        methods::GET_FRIEND_LIST => friend_list(ctx).await,
        methods::GET_GROUP_LIST => group_list(ctx).await,
        methods::GET_GROUP_MEMBER_LIST => group_member_list(ctx).await,
        other => Err(Error::UnknownOptionsMethod(other.to_string())),
    }
}

pub async fn friend_list<C>(ctx: &C) -> Result<Vec<NodeOption>>
where
    C: LoadOptionsContext + ?Sized,
{
    let operation = Operation::GetFriendList;
    let friends: Vec<FriendInfo> =
        fetch_list(ctx, operation, RequestSpec::get(operation.endpoint())).await?;
    Ok(friends
        .into_iter()
        .map(|f| NodeOption::with_id(f.nickname, f.user_id))
        .collect())
}

pub async fn group_list<C>(ctx: &C) -> Result<Vec<NodeOption>>
where
    C: LoadOptionsContext + ?Sized,
{
    let operation = Operation::GetGroupList;
    let groups: Vec<GroupInfo> =
        fetch_list(ctx, operation, RequestSpec::get(operation.endpoint())).await?;
    Ok(groups
        .into_iter()
        .map(|g| NodeOption::with_id(g.group_name, g.group_id))
        .collect())
}

/// Members of the group currently selected in the `group_id` parameter.
pub async fn group_member_list<C>(ctx: &C) -> Result<Vec<NodeOption>>
where
    C: LoadOptionsContext + ?Sized,
{
    let group_id = ctx
        .current_parameter(params::GROUP_ID)
        .ok_or(Error::MissingParameter {
            name: params::GROUP_ID,
            item: 0,
        })
        .and_then(|v| value_to_id(&v, params::GROUP_ID, 0))?;

    let operation = Operation::GetGroupMemberList;
    let spec = RequestSpec::get(operation.endpoint()).with_query(json!({ "group_id": group_id }));
    let members: Vec<GroupMemberInfo> = fetch_list(ctx, operation, spec).await?;
    Ok(members
        .into_iter()
        .map(|m| NodeOption::with_id(m.nickname, m.user_id))
        .collect())
}

async fn fetch_list<C, T>(ctx: &C, operation: Operation, spec: RequestSpec) -> Result<Vec<T>>
where
    C: LoadOptionsContext + ?Sized,
    T: DeserializeOwned,
{
    let response = ctx.client().send(&spec).await?;
    ApiResponse::from_value(response)?.data_as_checked(operation.as_str())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Map;

    use super::*;
    use crate::core::action::HttpMethod;
    use crate::core::host::StaticOptionsContext;
    use crate::driver::MockApiClient;

    fn ok(data: Value) -> Value {
        json!({ "status": "ok", "retcode": 0, "data": data })
    }

    #[tokio::test]
    async fn friend_list_maps_to_options() {
        let mock = Arc::new(MockApiClient::new().with_response(
            "get_friend_list",
            ok(json!([
                { "user_id": 1001, "nickname": "Alice", "remark": "" },
                { "user_id": 1002, "nickname": "Bob", "remark": "b" },
            ])),
        ));
        let ctx = StaticOptionsContext::new(mock.clone(), Map::new());

        let options = load_options(&ctx, methods::GET_FRIEND_LIST).await.unwrap();
        assert_eq!(
            options[1],
            NodeOption {
                name: "Bob".into(),
                value: json!(1002),
                description: "1002".into(),
            }
        );
        assert_eq!(mock.calls()[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn group_member_list_passes_selected_group() {
        let mock = Arc::new(MockApiClient::new().with_response(
            "/get_group_member_list",
            ok(json!([{ "group_id": 7, "user_id": 55, "nickname": "Carol" }])),
        ));
        let mut selected = Map::new();
        selected.insert("group_id".into(), json!("7"));
        let ctx = StaticOptionsContext::new(mock.clone(), selected);

        let options = load_options(&ctx, methods::GET_GROUP_MEMBER_LIST)
            .await
            .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Carol");

        let calls = mock.calls();
        let call = &calls[0];
        assert_eq!(call.query, Some(json!({ "group_id": 7 })));
        assert_eq!(call.body, None);
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let ctx = StaticOptionsContext::new(Arc::new(MockApiClient::new()), Map::new());
        assert!(matches!(
            load_options(&ctx, "getChannelList").await,
            Err(Error::UnknownOptionsMethod(_))
        ));
    }
}

//! Permission Definitions
//!
//! - 顾客接口（浏览菜单、下单、查询订单）无需权限
//! - 管理接口按模块授权

/// 菜单管理（新增/编辑/删除/库存）
pub const MENU_WRITE: &str = "menu:write";

/// 订单管理（列表、状态流转）
pub const ORDERS_MANAGE: &str = "orders:manage";

/// 报表查看
pub const REPORTS_VIEW: &str = "reports:view";

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    let perms = match role_name {
        "admin" => DEFAULT_ADMIN_PERMISSIONS,
        _ => &[],
    };
    perms.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_permissions() {
        assert_eq!(get_default_permissions("admin"), vec!["all".to_string()]);
        assert!(get_default_permissions("staff").is_empty());
        assert!(get_default_permissions("guest").is_empty());
    }
}

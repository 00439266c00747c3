//! 订单模块
//!
//! 顾客下单 (校验、库存预留、服务端计价) 与订单状态流转:
//!
//! ```text
//! menunggu → diproses → diantar → selesai
//! ```
//!
//! 状态只能前进一步；重复设置当前状态为空操作。

pub mod service;

pub use service::OrderService;

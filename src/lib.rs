//! Contest Tabulation - 比赛实时计分后端服务
//!
//! 评委按细则提交评分，服务端汇总为环节得分与加权总分，
//! 并通过 WebSocket 向所有客户端实时推送分组排行榜。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 数据模型定义
//! - `realtime`: 连接注册表、消息格式与排行榜推送
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `tabulation`: 汇总与排名计算
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod tabulation;
pub mod utils;

//! HackHub - 创新赛事评审服务
//!
//! 基于 Actix Web 构建，负责评分规则、多范围评审（提交/阶段/项目）、
//! 草稿到 final 的评审生命周期、AI 辅助评审与交付跟踪矩阵。
//!
//! # 架构
//! - `ai`: 评分预言机适配（Ollama）
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod ai;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

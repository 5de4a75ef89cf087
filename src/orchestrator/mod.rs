//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次运行的调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用外壳
//! - 管理应用生命周期（初始化、运行）
//! - 持有带重试的 LLM 客户端
//! - 读取输入文档、写出 JSONL、输出全局统计
//!
//! ### `pipeline` - 出题流水线
//! - 切分文档（Vec<Chunk>）
//! - 按生成序号调度所有候选，控制并发数量
//! - 汇总候选池并选题
//!
//! ### `metrics` - 运行指标
//! - 有效率、平均难度、选项相似度、答案位置熵、单题耗时
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一个文档)
//!     ↓
//! pipeline (处理 Vec<Chunk>)
//!     ↓
//! workflow::CandidateFlow (处理单个候选)
//!     ↓
//! services (能力层：generator / heuristics / judge / scorer / selector)
//!     ↓
//! clients (基础设施：JsonCompleter)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管输入输出，pipeline 管调度
//! 2. **资源隔离**：只有编排层持有 LLM 客户端
//! 3. **向下依赖**：编排层 → workflow → services → clients
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod metrics;
pub mod pipeline;

// 重新导出主要类型
pub use app::App;
pub use metrics::{position_entropy, RunMetrics};
pub use pipeline::{build_quiz, PipelineOptions, RunReport};

//! # Interaction 模块
//!
//! 除可见度动画之外的页面交互。每个部件都是"事件 → 指令"的直接映射：
//!
//! | 部件 | 输入 | 输出 |
//! |------|------|------|
//! | [`NavMenu`] | 点击、滚动 | 菜单开关、当前 section 高亮 |
//! | [`ScrollEffects`] | 滚动 | header 标记、进度条、视差 |
//! | [`AnchorScroll`] | 点击 | 平滑滚动 |
//! | [`HoverEffects`] | 指针进入/离开/移动 | 表格行缩放、卡片倾斜 |
//! | [`CopyButton`] | 点击、剪贴板结果、定时器 | 复制代码 |
//! | [`Snowfall`] | 定时器 | 雪花生成与移除 |
//! | [`Lifecycle`] | DOM 就绪、加载完毕、定时器 | body 标记、预加载遮罩 |
//!
//! 页面上找不到的可选元素只会让对应部件什么也不做。

pub mod anchor;
pub mod copy;
pub mod hover;
pub mod lifecycle;
pub mod nav;
pub mod scroll;
pub mod snow;

pub use anchor::AnchorScroll;
pub use copy::CopyButton;
pub use hover::{HoverEffects, tilt_transform};
pub use lifecycle::Lifecycle;
pub use nav::NavMenu;
pub use scroll::{ScrollEffects, progress_percent};
pub use snow::{Flake, Snowfall};

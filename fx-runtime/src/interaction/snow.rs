//! # 雪花
//!
//! 全屏覆盖层中不断生成下落的雪花，每片在动画播完后移除。
//!
//! 随机数来自 Host 提供的种子（`SmallRng`），测试中固定种子即可复现。

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::trace;

use crate::command::{Command, ElementSpec};
use crate::config::{FxConfig, SnowSettings};
use crate::element::{ElementId, GeneratedIds, PageQuery};
use crate::timer::{TimerTable, TimerTask};

const CONTAINER_CSS: &str = "
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    pointer-events: none;
    z-index: 9999;
    overflow: hidden;
";

const KEYFRAMES: &str = "
    @keyframes snowfallAnim {
        0% {
            transform: translateY(0) translateX(0) rotate(0deg);
            opacity: 1;
        }
        25% {
            transform: translateY(25vh) translateX(20px) rotate(90deg);
        }
        50% {
            transform: translateY(50vh) translateX(-20px) rotate(180deg);
        }
        75% {
            transform: translateY(75vh) translateX(20px) rotate(270deg);
        }
        100% {
            transform: translateY(105vh) translateX(0) rotate(360deg);
            opacity: 0.3;
        }
    }
";

/// 一片雪花的随机参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flake {
    /// 直径（px），2 - 6
    pub size: f64,
    /// 水平起点（px），0 - 视口宽度
    pub start_x: f64,
    /// 下落时长（s），10 - 20
    pub duration: f64,
    /// 动画延迟（s），0 - 5
    pub delay: f64,
    /// 0.4 - 1.0
    pub opacity: f64,
}

impl Flake {
    pub fn random(rng: &mut impl Rng, viewport_width: f64) -> Self {
        Self {
            size: rng.gen_range(2.0..6.0),
            start_x: if viewport_width > 0.0 {
                rng.gen_range(0.0..viewport_width)
            } else {
                0.0
            },
            duration: rng.gen_range(10.0..20.0),
            delay: rng.gen_range(0.0..5.0),
            opacity: rng.gen_range(0.4..1.0),
        }
    }

    /// 从生成到移除的时间
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs_f64(self.duration + self.delay)
    }

    pub fn css(&self) -> String {
        format!(
            "
            position: absolute;
            width: {size}px;
            height: {size}px;
            background: radial-gradient(circle, rgba(255,255,255,0.9) 0%, rgba(255,255,255,0.1) 100%);
            border-radius: 50%;
            left: {x}px;
            top: -10px;
            opacity: {opacity};
            animation: snowfallAnim {duration}s linear {delay}s infinite;
            box-shadow: 0 0 {glow}px rgba(255, 255, 255, 0.3);
        ",
            size = self.size,
            x = self.start_x,
            opacity = self.opacity,
            duration = self.duration,
            delay = self.delay,
            glow = self.size * 2.0,
        )
    }
}

/// 雪花效果
#[derive(Debug)]
pub struct Snowfall {
    container: ElementId,
    rng: SmallRng,
    live: usize,
}

impl Snowfall {
    /// 创建覆盖层与关键帧样式，并登记初始的错开生成和之后的周期生成
    pub fn start(
        config: &FxConfig,
        seed: u64,
        ids: &mut GeneratedIds,
        timers: &mut TimerTable,
    ) -> (Self, Vec<Command>) {
        let SnowSettings {
            initial_flakes,
            initial_stagger_ms,
            spawn_interval_ms,
            ..
        } = config.snow;

        let container = ids.allocate();
        let mut commands = vec![
            Command::CreateElement {
                id: container,
                parent: ElementId::Body,
                spec: ElementSpec::new("div")
                    .class("snow-container")
                    .css(CONTAINER_CSS),
            },
            Command::CreateElement {
                id: ids.allocate(),
                parent: ElementId::Head,
                spec: ElementSpec::new("style").text(KEYFRAMES),
            },
        ];

        for i in 0..u64::from(initial_flakes) {
            let (_, start) = timers.after(
                TimerTask::SnowSpawn,
                Duration::from_millis(i * initial_stagger_ms),
            );
            commands.push(start);
        }
        let (_, start) = timers.every(
            TimerTask::SnowSpawn,
            Duration::from_millis(spawn_interval_ms),
        );
        commands.push(start);

        let snow = Self {
            container,
            rng: SmallRng::seed_from_u64(seed),
            live: 0,
        };
        (snow, commands)
    }

    /// 生成一片雪花，并登记它的移除
    pub fn spawn(
        &mut self,
        page: &dyn PageQuery,
        ids: &mut GeneratedIds,
        timers: &mut TimerTable,
    ) -> Vec<Command> {
        let flake = Flake::random(&mut self.rng, page.viewport_width());
        let id = ids.allocate();
        let (_, expire) = timers.after(TimerTask::SnowflakeExpire { flake: id }, flake.lifetime());
        self.live += 1;
        trace!(flake = %id, live = self.live, "生成雪花");
        vec![
            Command::CreateElement {
                id,
                parent: self.container,
                spec: ElementSpec::new("div").css(flake.css()),
            },
            expire,
        ]
    }

    pub fn expire(&mut self, flake: ElementId) -> Vec<Command> {
        self.live = self.live.saturating_sub(1);
        trace!(flake = %flake, live = self.live, "雪花移除");
        vec![Command::RemoveElement { target: flake }]
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    /// 当前在页面上的雪花数量
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.live
    }
}

//! The built-in example instance
//!
//! A small fabrication shop: three machines with different daily shifts and
//! four jobs flowing cut -> mill -> paint over a five-day horizon.

use shopplan_core::{Machine, Shop, Task};

/// Three machines, four jobs, ten tasks, five days.
pub fn factory_shop() -> Shop {
    let mut shop = Shop::new("Fabrication Shop").horizon_days(5);

    // Daily shifts in minutes from midnight
    shop.machines
        .push(Machine::new("LaserCutter").window(480, 1020)); // 08:00-17:00
    shop.machines
        .push(Machine::new("CNC_Mill").window(480, 960)); // 08:00-16:00
    shop.machines
        .push(Machine::new("PaintStation").window(540, 1080)); // 09:00-18:00

    // Job 1: cut, mill, paint
    shop.tasks.push(
        Task::new("Job1-Cutting")
            .name("Cutting")
            .job("Job1")
            .on("LaserCutter")
            .duration_hours(3),
    );
    shop.tasks.push(
        Task::new("Job1-Milling")
            .name("Milling")
            .job("Job1")
            .on("CNC_Mill")
            .duration_hours(2)
            .after("Job1-Cutting"),
    );
    shop.tasks.push(
        Task::new("Job1-Painting")
            .name("Painting")
            .job("Job1")
            .on("PaintStation")
            .duration_hours(1)
            .after("Job1-Milling"),
    );

    // Job 2: cut, paint
    shop.tasks.push(
        Task::new("Job2-Cutting")
            .name("Cutting")
            .job("Job2")
            .on("LaserCutter")
            .duration_hours(2),
    );
    shop.tasks.push(
        Task::new("Job2-Painting")
            .name("Painting")
            .job("Job2")
            .on("PaintStation")
            .duration_hours(1)
            .after("Job2-Cutting"),
    );

    // Job 3: mill, paint
    shop.tasks.push(
        Task::new("Job3-Milling")
            .name("Milling")
            .job("Job3")
            .on("CNC_Mill")
            .duration_hours(4),
    );
    shop.tasks.push(
        Task::new("Job3-Painting")
            .name("Painting")
            .job("Job3")
            .on("PaintStation")
            .duration_hours(2)
            .after("Job3-Milling"),
    );

    // Job 4: cut, mill, paint
    shop.tasks.push(
        Task::new("Job4-Cutting")
            .name("Cutting")
            .job("Job4")
            .on("LaserCutter")
            .duration_hours(5),
    );
    shop.tasks.push(
        Task::new("Job4-Milling")
            .name("Milling")
            .job("Job4")
            .on("CNC_Mill")
            .duration_hours(3)
            .after("Job4-Cutting"),
    );
    shop.tasks.push(
        Task::new("Job4-Painting")
            .name("Painting")
            .job("Job4")
            .on("PaintStation")
            .duration_hours(2)
            .after("Job4-Milling"),
    );

    shop
}

//! Full example code for setting up an SH1107 display. This runs on an STM32F303RE, using a
//! 128x64 SH1107 module connected to I2C1 (PB6 SCL, PB7 SDA) at address 0x3C, and PA9 for /RESET.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_graphics;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate sh1107;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use hal::i2c::I2c;
use hal::prelude::*;
use sh1107 as oled;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);
    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);

    // Set up I2C1, which is Alternate Function 4 for GPIOs PB6,7.
    let scl = gpiob.pb6.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let sda = gpiob.pb7.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let i2c = I2c::i2c1(dp.I2C1, (scl, sda), 400.khz(), clocks, &mut rcc.apb1);

    // PA9 is the display's /RESET pin.
    let disp_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    let config = oled::Config::new(128, 64);
    let mut disp = oled::Sh1107::i2c_with_reset_pin(i2c, disp_rst, config).unwrap();

    // Pulse /RESET and send the power-on table.
    disp.setup(&mut delay).unwrap();

    let mut fb = disp.framebuffer::<1024>().unwrap();
    let style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    Rectangle::new(Point::new(0, 0), Size::new(128, 64))
        .into_styled(style)
        .draw(&mut fb)
        .unwrap();
    Line::new(Point::new(0, 0), Point::new(127, 63))
        .into_styled(style)
        .draw(&mut fb)
        .unwrap();
    Circle::new(Point::new(48, 16), 32)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut fb)
        .unwrap();

    // A failed flush leaves a partial image; try once more from the window.
    if disp.flush(&fb).is_err() {
        disp.flush(&fb).unwrap();
    }

    loop {
        asm::wfi();
    }
}

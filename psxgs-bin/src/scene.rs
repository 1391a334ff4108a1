use psxgs::*;

use crate::Scene;

pub fn build<B: Bus, P: PollStrategy>(gs: &mut Gs<'_, B, P>, scene: Scene) -> Result<()> {
    gs.set_draw_env_queued(&DrawEnv::new(0, 0, 320, 240))?;
    gs.set_disp_env_queued(&DispEnv::new(0, 0))?;
    gs.sort_cls(Color::new(0, 0, 48))?;
    match scene {
        Scene::Shapes => shapes(gs),
        Scene::Lines => lines(gs),
        Scene::Sprites => sprites(gs),
    }
}

fn shapes<B: Bus, P: PollStrategy>(gs: &mut Gs<'_, B, P>) -> Result<()> {
    gs.sort_poly3(&Poly3 {
        points: [Vertex::new(20, 20), Vertex::new(80, 20), Vertex::new(20, 80)],
        color: Color::new(255, 0, 0),
        attribute: Attribute::empty(),
    })?;
    gs.sort_poly4(&Poly4 {
        points: [Vertex::new(100, 20), Vertex::new(160, 20), Vertex::new(100, 80), Vertex::new(160, 80)],
        color: Color::new(0, 0, 255),
        attribute: Attribute::SemiTrans | Attribute::trans(TransMode::Add),
    })?;
    gs.sort_gpoly3(&GPoly3 {
        points: [Vertex::new(180, 80), Vertex::new(240, 20), Vertex::new(300, 80)],
        colors: [Color::new(255, 0, 0), Color::new(0, 255, 0), Color::new(0, 0, 255)],
        attribute: Attribute::empty(),
    })?;
    gs.sort_gpoly4(&GPoly4 {
        points: [Vertex::new(20, 120), Vertex::new(300, 120), Vertex::new(20, 220), Vertex::new(300, 220)],
        colors: [Color::grey(0), Color::grey(64), Color::grey(128), Color::grey(255)],
        attribute: Attribute::empty(),
    })?;
    gs.sort_dot(&Dot {
        point: Vertex::new(160, 100),
        color: Color::grey(255),
        attribute: Attribute::empty(),
    })
}

fn lines<B: Bus, P: PollStrategy>(gs: &mut Gs<'_, B, P>) -> Result<()> {
    gs.sort_line(&Line {
        points: [Vertex::new(0, 0), Vertex::new(319, 239)],
        color: Color::grey(255),
        attribute: Attribute::empty(),
    })?;
    gs.sort_gline(&GLine {
        points: [Vertex::new(319, 0), Vertex::new(0, 239)],
        colors: [Color::new(255, 0, 0), Color::new(0, 0, 255)],
        attribute: Attribute::empty(),
    })?;

    let wave = (0..32)
        .map(|n| Vertex::new(n * 10, 120 + if n % 2 == 0 { -20 } else { 20 }))
        .collect::<Vec<_>>();
    gs.sort_polyline(&PolyLine {
        points: &wave,
        color: Color::new(255, 255, 0),
        attribute: Attribute::empty(),
    })?;
    let colors = (0..wave.len())
        .map(|n| Color::new((n * 8) as u8, 0, 255 - (n * 8) as u8))
        .collect::<Vec<_>>();
    let shifted = wave.iter().map(|v| Vertex::new(v.x, v.y + 60)).collect::<Vec<_>>();
    gs.sort_gpolyline(&GPolyLine {
        points: &shifted,
        colors: &colors,
        attribute: Attribute::empty(),
    })
}

fn sprites<B: Bus, P: PollStrategy>(gs: &mut Gs<'_, B, P>) -> Result<()> {
    let tpage = texture_page(640, 0);
    let clut = ClutPos::new(0, 480);

    let checker = (0..16 * 16)
        .map(|n| if (n / 16 + n % 16) % 2 == 0 { 0x7FFF } else { 0x001F })
        .collect::<Vec<u16>>();
    gs.load_image(&checker, 640, 0, 16, 16)?;

    let base = Sprite {
        clut,
        attribute: Attribute::color(ColorMode::Direct15),
        ..Sprite::new(16, 16, 16, 16, tpage, 0, 0)
    };
    gs.sort_sprite(&base)?;
    gs.sort_sprite(&Sprite { x: 48, attribute: base.attribute | Attribute::HFlip, ..base })?;
    gs.sort_sprite(&Sprite { x: 80, scale_x: 2, scale_y: 2, ..base })?;
    gs.sort_sprite(&Sprite { x: 140, scale_x: SCALE_ONE / 2, scale_y: SCALE_ONE / 2, ..base })?;
    gs.sort_sprite(&Sprite { x: 200, y: 100, rotate: 30 << 12, ..base })
}
